use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Series structures produced by the transform engine
// ---------------------------------------------------------------------------

/// Group-stacked series over one period axis.
///
/// `groups` carries the stacking order; `series_by_group` holds one
/// axis-length vector per group key listed in `groups`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedSeries {
    pub labels: Vec<String>,
    pub groups: Vec<String>,
    pub series_by_group: HashMap<String, Vec<f64>>,
}

impl StackedSeries {
    /// Structure with an axis but no groups
    pub fn empty(labels: Vec<String>) -> Self {
        Self {
            labels,
            groups: Vec::new(),
            series_by_group: HashMap::new(),
        }
    }

    pub fn axis_len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn series(&self, group: &str) -> Option<&[f64]> {
        self.series_by_group.get(group).map(|s| s.as_slice())
    }

    /// Series in stacking order, skipping keys without a vector
    pub fn ordered(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
        self.groups.iter().filter_map(move |g| {
            self.series_by_group
                .get(g)
                .map(|s| (g.as_str(), s.as_slice()))
        })
    }
}

/// Ratio series derived from an actual and a target series.
/// `None` marks slots where no ratio can be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementSeries {
    pub ratio: Vec<Option<f64>>,
    pub cumulative_ratio: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Renderer contract
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Bar,
    Line,
}

/// Value axis a dataset is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisId {
    #[default]
    #[serde(rename = "y")]
    Primary,
    #[serde(rename = "y1")]
    Secondary,
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub label: String,
    pub kind: DatasetKind,
    /// Slot values; `None` is a gap in the plotted line
    pub data: Vec<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub y_axis: AxisId,
}

impl Dataset {
    pub fn bar(label: impl Into<String>, data: &[f64]) -> Self {
        Self {
            label: label.into(),
            kind: DatasetKind::Bar,
            data: data.iter().copied().map(Some).collect(),
            stack: None,
            color: None,
            y_axis: AxisId::Primary,
        }
    }

    pub fn line(label: impl Into<String>, data: Vec<Option<f64>>) -> Self {
        Self {
            label: label.into(),
            kind: DatasetKind::Line,
            data,
            stack: None,
            color: None,
            y_axis: AxisId::Primary,
        }
    }

    pub fn stacked(mut self, stack: &str) -> Self {
        self.stack = Some(stack.to_string());
        self
    }

    pub fn colored(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn on_secondary_axis(mut self) -> Self {
        self.y_axis = AxisId::Secondary;
        self
    }
}

/// Everything a renderer needs to draw one chart region: `{labels, datasets}`
/// plus display hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub stacked: bool,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f64>,
}

impl ChartSpec {
    pub fn new(id: &str, title: &str, labels: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            stacked: false,
            labels,
            datasets: Vec::new(),
            y_max: None,
        }
    }

    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }

    pub fn with_y_max(mut self, y_max: f64) -> Self {
        self.y_max = Some(y_max);
        self
    }

    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn with_datasets(mut self, datasets: impl IntoIterator<Item = Dataset>) -> Self {
        self.datasets.extend(datasets);
        self
    }

    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label == label)
    }
}
