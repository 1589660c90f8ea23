//! Agglomerative clustering over condensed distance matrices.
//!
//! Bottom-up: start with each item as its own cluster, repeatedly merge the
//! two closest clusters until one remains. The merge history is a
//! [`LinkageTree`](crate::hierarchy::LinkageTree).
//!
//! **Methods** determine "distance between clusters":
//!
//! | Method | Distance | Effect |
//! |--------|----------|--------|
//! | Single | min(pairwise) | Chaining; elongated clusters |
//! | Complete | max(pairwise) | Compact, spherical clusters |
//! | Average | mean(pairwise) | Balanced compromise |
//! | Weighted | mean of parents | Like average, ignores sizes |
//! | Centroid | centroid gap | Can invert (non-monotone heights) |
//! | Median | weighted centroid gap | Can invert |
//! | Ward | Variance increase | Minimizes within-cluster variance |
//!
//! Centroid, median and Ward assume the input distances are Euclidean.
//!
//! ## Usage
//!
//! ```rust
//! use clustermap::cluster::{cluster, Method};
//! use clustermap::distance::{pairwise_distances, Metric};
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0], [0.1, 0.1], [10.0, 10.0], [10.1, 10.1]];
//! let d = pairwise_distances(data.view(), Metric::Euclidean).unwrap();
//! let tree = cluster(&d, Method::Complete).unwrap();
//!
//! assert_eq!(tree.n_steps(), 3);
//! let labels = tree.cut_to_k(2).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

mod hierarchical;
mod method;

pub use hierarchical::{cluster, HierarchicalClustering};
pub use method::Method;
