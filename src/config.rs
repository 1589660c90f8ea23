//! Clustering options.
//!
//! Options arrive as loosely typed key/value maps from the calling service.
//! They deserialise into fixed structures: unknown keys are ignored, missing
//! keys take the defaults below, and unknown metric or method *values* are
//! hard errors.
//!
//! | Key | Field | Default |
//! |-----|-------|---------|
//! | `logTransform` | [`PreprocessOptions::log_transform`] | `false` |
//! | `normalize` / `normalizeData` | [`PreprocessOptions::normalize`] | `true` |
//! | `metric` / `distanceMetric` | [`ClusterConfig::metric`] | `euclidean` |
//! | `method` / `linkageMethod` | [`ClusterConfig::method`] | `complete` |
//! | `clusterRows` | [`ClusterConfig::cluster_rows`] | `true` |
//! | `clusterColumns` | [`ClusterConfig::cluster_columns`] | `true` |

use crate::cluster::{HierarchicalClustering, Method};
use crate::distance::Metric;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which transforms to apply before measuring distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreprocessOptions {
    /// Replace each value `v` with `log2(v + 1)`.
    pub log_transform: bool,
    /// Standardise each row to mean 0, sample standard deviation 1.
    #[serde(alias = "normalizeData")]
    pub normalize: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            log_transform: false,
            normalize: true,
        }
    }
}

/// Full configuration of a two-way clustering run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterConfig {
    /// Transforms applied before clustering.
    #[serde(flatten)]
    pub preprocess: PreprocessOptions,
    /// Distance between feature or sample vectors.
    #[serde(alias = "distanceMetric")]
    pub metric: Metric,
    /// Agglomeration method.
    #[serde(alias = "linkageMethod")]
    pub method: Method,
    /// Cluster and reorder rows; when false rows keep input order.
    pub cluster_rows: bool,
    /// Cluster and reorder columns; when false columns keep input order.
    pub cluster_columns: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessOptions::default(),
            metric: Metric::default(),
            method: Method::default(),
            cluster_rows: true,
            cluster_columns: true,
        }
    }
}

impl ClusterConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the linkage method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Enable or disable `log2(v + 1)`.
    pub fn with_log_transform(mut self, enabled: bool) -> Self {
        self.preprocess.log_transform = enabled;
        self
    }

    /// Enable or disable row standardisation.
    pub fn with_normalize(mut self, enabled: bool) -> Self {
        self.preprocess.normalize = enabled;
        self
    }

    /// Enable or disable clustering of both axes at once.
    pub fn with_dendrograms(mut self, enabled: bool) -> Self {
        self.cluster_rows = enabled;
        self.cluster_columns = enabled;
        self
    }

    /// The clusterer this configuration describes.
    pub fn clusterer(&self) -> HierarchicalClustering {
        HierarchicalClustering::new(self.method).with_metric(self.metric)
    }

    /// Reject metric/method pairs that make no sense together.
    pub fn validate(&self) -> Result<()> {
        self.clusterer().validate()
    }
}
