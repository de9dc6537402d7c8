pub mod d410_sales_analytics;
