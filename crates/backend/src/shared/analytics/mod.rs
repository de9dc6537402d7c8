//! Transform engine: reshapes row collections from the sales API into
//! chart-ready series. Everything here is synchronous and side-effect free.

pub mod achievement;
pub mod charts;
pub mod kpi;
pub mod numeric;
pub mod periods;
pub mod profit;
pub mod stacker;
pub mod top_n;
