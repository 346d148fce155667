//! Print the graph snapshot query.

use anyhow::Result;

use kgvec_graph::EntityQuery;

use crate::config::AppConfig;

pub fn execute(config: &AppConfig) -> Result<()> {
    let query = EntityQuery::for_graphs(config.graph.graphs.clone());
    println!("{}", query.to_sparql());
    Ok(())
}
