use super::{BackendApi, Network, WebApi};

pub trait SearchNetwork {
  async fn search(&mut self, query: String);
}

impl<B: BackendApi, W: WebApi> SearchNetwork for Network<B, W> {
  async fn search(&mut self, query: String) {
    match self.backend.search(&query).await {
      Ok(results) => {
        let mut app = self.app.lock().await;
        if results.is_empty() {
          app.set_status_message(format!("No results for \"{}\"", query), 3);
        }
        app.set_search_results(results);
      }
      // Stale results from an earlier query would be misleading
      Err(e) => {
        self.app.lock().await.set_search_results(vec![]);
        self.handle_error(e.context("Search failed")).await;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::super::fakes::{FakeBackend, FakeWebApi};
  use super::*;
  use crate::core::app::App;
  use crate::core::model::SearchResultItem;
  use serde_json::json;
  use std::sync::Arc;
  use tokio::sync::Mutex;

  fn item(name: &str) -> SearchResultItem {
    SearchResultItem(json!({ "name": name }))
  }

  #[tokio::test]
  async fn stores_results_in_order() {
    let app = Arc::new(Mutex::new(App::default()));
    let backend = FakeBackend {
      search_results: Some(vec![item("One"), item("Two")]),
      ..Default::default()
    };
    let mut network = Network::new(backend, FakeWebApi::default(), &app);

    network.search("daft punk".to_string()).await;

    assert_eq!(
      *network.backend.queries.lock().unwrap(),
      vec!["daft punk".to_string()]
    );
    let app = app.lock().await;
    assert_eq!(app.search_results, vec![item("One"), item("Two")]);
    assert_eq!(app.selected_search_index, Some(0));
  }

  #[tokio::test]
  async fn failure_clears_previous_results() {
    let app = Arc::new(Mutex::new(App::default()));
    app.lock().await.set_search_results(vec![item("Old")]);
    let mut network = Network::new(FakeBackend::default(), FakeWebApi::default(), &app);

    network.search("anything".to_string()).await;

    let app = app.lock().await;
    assert!(app.search_results.is_empty());
    assert_eq!(app.selected_search_index, None);
    assert!(app
      .status_message
      .as_deref()
      .is_some_and(|m| m.starts_with("Search failed")));
  }
}
