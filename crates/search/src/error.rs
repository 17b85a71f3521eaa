use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Graph error: {0}")]
    Graph(#[from] kinship_graph::GraphError),

    #[error("Empty query")]
    EmptyQuery,

    #[error("Empty {0} fragment: a given name or surname is required")]
    EmptyFragment(&'static str),

    #[error("Invalid search config: {0}")]
    InvalidConfig(String),
}
