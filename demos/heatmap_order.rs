use clustermap::{cluster_heatmap, ClusterConfig, Method, Metric};

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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Fourteen genes over two sample groups; the clustered column order
    // should keep each group together.
    let config = ClusterConfig::new()
        .with_metric(Metric::Euclidean)
        .with_method(Method::Complete)
        .with_normalize(true);
    let out = cluster_heatmap(EXPRESSION, &config)?;

    println!("config: {}", serde_json::to_string(&config)?);
    println!("columns: {:?}", out.matrix.column_ids());
    println!("groups:  {:?}", out.column_groups);
    println!("rows:    {:?}", out.matrix.row_ids());

    if let Some(tree) = &out.columns.tree {
        for (s, step) in tree.iter().enumerate() {
            println!(
                "  merge {}: {} + {} at {:.4} (size {})",
                tree.n_items() + s,
                step.left,
                step.right,
                step.distance,
                step.size
            );
        }
        let labels = tree.cut_to_k(2)?;
        println!("two-way cut of columns: {:?}", labels);
    }

    Ok(())
}
