#[cfg(test)]
mod tests {
    use crate::cluster::Method;
    use crate::config::ClusterConfig;
    use crate::distance::Metric;
    use crate::error::Error;
    use crate::matrix::parse;
    use crate::pipeline::{cluster_heatmap, cluster_matrix};
    use crate::Result;

    const EXPRESSION: &str = "\
Group\tA\tA\tA\tB\tB\tB
sample\tA-1\tA-2\tA-3\tB-1\tB-2\tB-3
ICA1\t5.7\t11.7\t9.9\t5.7\t4.5\t3.2
DBNDD1\t9.43\t10.67\t9.39\t3.4\t2.5\t2.3
ALS2\t10.59\t9.89\t8.5\t4.2\t5.75\t2.5
CASP10\t10.38\t10.2\t8.5\t5.1\t2.8\t2.4
CFLAR\t5.75\t10.85\t10.9\t3.9\t4.2\t2.8
TFPI\t9.82\t10.45\t8.5\t2.5\t3.4\t3.5
NDUFAF7\t8.9\t11.02\t10.33\t5.75\t2.4\t5.75
RBM5\t10.59\t10.67\t9.94\t6.55\t5.75\t5.55
MTMR7\t2.5\t5.2\t3.5\t9.21\t9.76\t11.47
SLC7A2\t3.5\t4.2\t2.5\t9.21\t11.78\t5.75
ARF5\t4.5\t3.2\t2.7\t9.89\t10.72\t8.81
SARM1\t3.5\t2.2\t1.9\t10.85\t9.76\t9.73
POLDIP2\t3.5\t4.2\t3.5\t11.33\t9.76\t10.49
PLXND1\t5.1\t1.2\t5.75\t11.22\t9.76\t8.81
";

    /// True if every label's occurrences form one contiguous run.
    fn contiguous(labels: &[String]) -> bool {
        let mut closed: Vec<&str> = Vec::new();
        let mut current: Option<&str> = None;
        for l in labels {
            if current != Some(l.as_str()) {
                if closed.contains(&l.as_str()) {
                    return false;
                }
                if let Some(c) = current {
                    closed.push(c);
                }
                current = Some(l);
            }
        }
        true
    }

    #[test]
    fn test_recovers_sample_groups() -> Result<()> {
        let config = ClusterConfig::new()
            .with_metric(Metric::Euclidean)
            .with_method(Method::Complete)
            .with_normalize(true);
        let out = cluster_heatmap(EXPRESSION, &config)?;

        assert_eq!(out.columns.order, vec![5, 3, 4, 0, 1, 2]);
        assert_eq!(out.column_groups, vec!["B", "B", "B", "A", "A", "A"]);
        assert!(contiguous(&out.column_groups));
        assert_eq!(out.distinct_groups(), vec!["B", "A"]);
        assert_eq!(
            out.matrix.column_ids(),
            &["B-3", "B-1", "B-2", "A-1", "A-2", "A-3"]
        );

        // Genes high in A (first eight) and genes high in B (last six) each
        // form one block.
        let row_block: Vec<String> = out
            .rows
            .order
            .iter()
            .map(|&r| if r < 8 { "A-high" } else { "B-high" }.to_string())
            .collect();
        assert!(contiguous(&row_block), "{:?}", out.matrix.row_ids());
        Ok(())
    }

    #[test]
    fn test_every_method_keeps_groups_contiguous() -> Result<()> {
        for method in Method::ALL {
            for normalize in [true, false] {
                let config = ClusterConfig::new()
                    .with_method(method)
                    .with_normalize(normalize);
                let out = cluster_heatmap(EXPRESSION, &config)?;
                assert!(
                    contiguous(&out.column_groups),
                    "{method} normalize={normalize}: {:?}",
                    out.column_groups
                );
            }
        }
        Ok(())
    }

    #[test]
    fn test_output_is_consistent_with_orders() -> Result<()> {
        let config = ClusterConfig::new().with_method(Method::Average);
        let out = cluster_heatmap(EXPRESSION, &config)?;

        assert_eq!(out.raw.n_rows(), 14);
        assert_eq!(out.raw.get(0, 0), Some(5.7));
        let row_tree = out.rows.tree.as_ref().unwrap();
        assert_eq!(row_tree.n_steps(), 13);
        assert_eq!(out.columns.tree.as_ref().unwrap().n_steps(), 5);

        for (i, &r) in out.rows.order.iter().enumerate() {
            assert_eq!(out.matrix.row_ids()[i], out.raw.row_ids()[r]);
        }
        for (j, &c) in out.columns.order.iter().enumerate() {
            assert_eq!(out.matrix.column_ids()[j], out.raw.column_ids()[c]);
        }

        let layout = out.rows.layout().unwrap()?;
        assert_eq!(layout.leaves, out.rows.order);
        assert_eq!(layout.links.len(), 13);
        Ok(())
    }

    #[test]
    fn test_repeated_runs_are_identical() -> Result<()> {
        let config = ClusterConfig::new().with_method(Method::Ward);
        let a = cluster_heatmap(EXPRESSION, &config)?;
        let b = cluster_heatmap(EXPRESSION, &config)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_dendrograms_off_keeps_input_order() -> Result<()> {
        let config = ClusterConfig::new().with_dendrograms(false);
        let out = cluster_heatmap(EXPRESSION, &config)?;
        assert!(out.rows.tree.is_none());
        assert!(out.columns.tree.is_none());
        assert_eq!(out.columns.order, (0..6).collect::<Vec<_>>());
        assert_eq!(out.matrix.row_ids(), out.raw.row_ids());
        assert_eq!(out.column_groups, vec!["A", "A", "A", "B", "B", "B"]);
        assert!(out.rows.layout().is_none());
        Ok(())
    }

    #[test]
    fn test_constant_row_is_zeroed_and_still_clusters() -> Result<()> {
        let raw = "G\tA\tA\tB\tB\n\
                   s\ta1\ta2\tb1\tb2\n\
                   flat\t3\t3\t3\t3\n\
                   up\t1\t2\t8\t9\n\
                   down\t9\t8\t2\t1\n";
        let out = cluster_heatmap(raw, &ClusterConfig::new())?;
        let flat = out.matrix.row_ids().iter().position(|id| id == "flat").unwrap();
        assert!(out.matrix.row(flat).iter().all(|v| *v == 0.0));
        assert!(out.matrix.values().iter().all(|v| v.is_finite()));
        assert!(contiguous(&out.column_groups));
        Ok(())
    }

    #[test]
    fn test_log_transform_rejects_values_below_minus_one() {
        let raw = "G\tA\tB\ns\ta\tb\ng1\t1\t-2\ng2\t3\t4\n";
        let config = ClusterConfig::new().with_log_transform(true);
        assert!(matches!(
            cluster_heatmap(raw, &config),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_huge_values_fail_instead_of_flattening() {
        let raw = "G\tA\tB\tB\ns\ta\tb1\tb2\ng1\t0\t1e200\t-1e200\ng2\t0\t1\t2\n";
        let config = ClusterConfig::new()
            .with_method(Method::Ward)
            .with_normalize(false);
        assert!(matches!(
            cluster_heatmap(raw, &config),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_single_row_cannot_be_clustered() {
        let raw = "G\tA\tB\ns\ta\tb\ng1\t1\t2\n";
        let err = cluster_heatmap(raw, &ClusterConfig::new()).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput { .. }));

        // Column clustering alone is fine.
        let mut config = ClusterConfig::new();
        config.cluster_rows = false;
        let out = cluster_heatmap(raw, &config).unwrap();
        assert_eq!(out.columns.order.len(), 2);
    }

    #[test]
    fn test_invalid_metric_method_pair_fails_before_parsing() {
        let config = ClusterConfig::new()
            .with_method(Method::Centroid)
            .with_metric(Metric::Cosine);
        let err = cluster_heatmap("not even close", &config).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput { .. }));
    }

    #[test]
    fn test_malformed_text_is_surfaced() {
        let err = cluster_heatmap("G\tA\ns\ta\n", &ClusterConfig::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_cluster_matrix_accepts_parsed_input() -> Result<()> {
        let (m, g) = parse(EXPRESSION)?;
        let out = cluster_matrix(m.clone(), g, &ClusterConfig::new())?;
        assert_eq!(out.raw, m);
        Ok(())
    }
}
