//! SPARQL 1.1 Graph Store HTTP Protocol client.
//!
//! Thin async client for pushing mapped RDF into a triple store: the four
//! Graph Store verbs, SPARQL Update, and an `INSERT DATA` builder fed
//! straight from a lazy triple stream. When `graph` is `None` the endpoint
//! is assumed to use direct graph identification.

use crate::error::{Error, Result};
use crate::mapping::Triple;
use crate::ntriples::to_ntriples;
use log::{info, warn};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Client for one SPARQL Graph Store / Update endpoint.
pub struct GraphStoreClient {
    client: reqwest::Client,
    endpoint: String,
    auth: Option<(String, String)>,
}

impl GraphStoreClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into(), auth: None })
    }

    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = Some((username.into(), password.into()));
        self
    }

    fn graph_endpoint(&self, graph: Option<&str>) -> String {
        match graph {
            Some(graph) => format!("{}?graph={}", self.endpoint, graph),
            None => self.endpoint.clone(),
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some((username, password)) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }

    fn check_status(&self, method: &str, url: &str, status: reqwest::StatusCode) -> Result<()> {
        if status.as_u16() >= 400 {
            warn!("{} request to {} failed: {}", method, url, status);
            return Err(Error::Http(format!("{} request to {} failed: {}", method, url, status)));
        }
        Ok(())
    }

    /// GET a graph's serialized content.
    pub async fn get(&self, graph: Option<&str>, content_type: &str) -> Result<String> {
        let url = self.graph_endpoint(graph);
        let request = self.apply_auth(self.client.get(&url)).header("Accept", content_type);
        let response = request.send().await?;
        self.check_status("GET", &url, response.status())?;
        Ok(response.text().await?)
    }

    /// POST serialized RDF data into a graph (merge semantics).
    pub async fn post(&self, data: String, graph: Option<&str>, content_type: &str) -> Result<()> {
        let url = self.graph_endpoint(graph);
        let request =
            self.apply_auth(self.client.post(&url)).header("Content-Type", content_type).body(data);
        let response = request.send().await?;
        self.check_status("POST", &url, response.status())
    }

    /// PUT serialized RDF data into a graph (replace semantics).
    pub async fn put(&self, data: String, graph: Option<&str>, content_type: &str) -> Result<()> {
        let url = self.graph_endpoint(graph);
        let request =
            self.apply_auth(self.client.put(&url)).header("Content-Type", content_type).body(data);
        let response = request.send().await?;
        self.check_status("PUT", &url, response.status())
    }

    /// DELETE a graph.
    pub async fn delete(&self, graph: Option<&str>) -> Result<()> {
        let url = self.graph_endpoint(graph);
        let response = self.apply_auth(self.client.delete(&url)).send().await?;
        self.check_status("DELETE", &url, response.status())
    }

    /// Execute a SPARQL Update query against the endpoint.
    pub async fn update(&self, query: &str) -> Result<()> {
        info!("Sending update to {}", self.endpoint);
        let request = self
            .apply_auth(self.client.post(&self.endpoint))
            .header("Content-Type", "application/sparql-update")
            .body(query.to_string());
        let response = request.send().await?;
        self.check_status("POST", &self.endpoint, response.status())
    }

    /// Insert a triple stream with `INSERT DATA`, optionally into a named
    /// graph. The stream is serialized before anything is sent, so a failing
    /// stream never produces a partial update.
    pub async fn insert_data<I>(&self, triples: I, graph: Option<&str>) -> Result<()>
    where
        I: IntoIterator<Item = Result<Triple>>,
    {
        let query = build_insert_data(triples, graph)?;
        self.update(&query).await
    }

    /// Clear a graph with SPARQL Update.
    pub async fn clear_graph(&self, graph: &str, silent: bool) -> Result<()> {
        let silent_keyword = if silent { "SILENT " } else { "" };
        self.update(&format!("CLEAR {}GRAPH <{}>", silent_keyword, graph)).await
    }
}

/// Build an `INSERT DATA` query from a triple stream.
pub fn build_insert_data<I>(triples: I, graph: Option<&str>) -> Result<String>
where
    I: IntoIterator<Item = Result<Triple>>,
{
    let mut query = String::from("INSERT DATA {\n");
    if let Some(graph) = graph {
        query.push_str(&format!("GRAPH <{}> {{\n", graph));
    }
    for triple in triples {
        query.push_str(&to_ntriples(&triple?));
        query.push('\n');
    }
    query.push_str("}\n");
    if graph.is_some() {
        query.push('}');
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Literal, Subject, Term, Triple};

    #[test]
    fn test_build_insert_data_with_graph() {
        let triples = vec![Ok(Triple::new(
            Subject::Named("http://ex/s".to_string()),
            "http://ex/p",
            Term::Literal(Literal::Integer(1)),
        ))];
        let query = build_insert_data(triples, Some("http://ex/g")).unwrap();
        assert!(query.starts_with("INSERT DATA {\nGRAPH <http://ex/g> {\n"));
        assert!(query.contains(
            "<http://ex/s> <http://ex/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        ));
        assert!(query.ends_with("}\n}"));
    }

    #[test]
    fn test_build_insert_data_propagates_stream_errors() {
        let triples = vec![Err(Error::Structure("subject stack underflow".to_string()))];
        assert!(build_insert_data(triples, None).is_err());
    }
}
