use std::collections::VecDeque;

use futures::Stream;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::Session;
use crate::domain::Instrument;
use crate::error::FigiError;
use crate::http_client::HttpMethod;

#[derive(Debug)]
enum Cursor {
    First,
    Next(Value),
    Exhausted,
}

/// Forward-only cursor over `/v2/search/` results.
///
/// Pages are fetched on demand: a request is sent only when the buffered
/// page runs out and the previous response carried a `next` cursor. Dropping
/// the cursor stops paging. Once exhausted (or after a raised error) it keeps
/// returning `None`.
pub struct SearchPages {
    session: Session,
    url: String,
    body: Map<String, Value>,
    buffer: VecDeque<Value>,
    cursor: Cursor,
    requests_sent: usize,
}

impl SearchPages {
    pub(crate) fn new(session: Session, url: String, body: Map<String, Value>) -> Self {
        Self {
            session,
            url,
            body,
            buffer: VecDeque::new(),
            cursor: Cursor::First,
            requests_sent: 0,
        }
    }

    /// Request body sent for the first page.
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn requests_sent(&self) -> usize {
        self.requests_sent
    }

    /// Pulls the next instrument, fetching the next page if needed.
    pub async fn next_item(&mut self) -> Option<Result<Instrument, FigiError>> {
        loop {
            if let Some(raw) = self.buffer.pop_front() {
                match Instrument::from_value(raw) {
                    Ok(instrument) => return Some(Ok(instrument)),
                    Err(err) => {
                        warn!(error = %err, "undecodable search result");
                        if self.session.raise_on_error() {
                            self.finish();
                            return Some(Err(FigiError::Decode(err)));
                        }
                        continue;
                    }
                }
            }

            let body = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
                Cursor::Exhausted => return None,
                Cursor::First => self.body.clone(),
                Cursor::Next(start) => {
                    let mut body = self.body.clone();
                    body.insert(String::from("start"), start);
                    body
                }
            };

            self.requests_sent += 1;
            debug!(page = self.requests_sent, url = %self.url, "fetching search page");
            let mut page = match self
                .session
                .request(HttpMethod::Post, &self.url, Some(&body))
                .await
            {
                Ok(page) => page,
                Err(err) => return Some(Err(err)),
            };

            let items = match page.remove("data") {
                Some(Value::Array(items)) if !items.is_empty() => items,
                _ => return None,
            };
            if let Some(next) = page.remove("next").filter(|next| !next.is_null()) {
                self.cursor = Cursor::Next(next);
            }
            self.buffer.extend(items);
        }
    }

    /// Drains every remaining page.
    pub async fn collect_all(mut self) -> Result<Vec<Instrument>, FigiError> {
        let mut instruments = Vec::new();
        while let Some(item) = self.next_item().await {
            instruments.push(item?);
        }
        Ok(instruments)
    }

    /// Adapts the cursor into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = Result<Instrument, FigiError>> + Send {
        futures::stream::unfold(self, |mut pages| async move {
            pages.next_item().await.map(|item| (item, pages))
        })
    }

    fn finish(&mut self) {
        self.buffer.clear();
        self.cursor = Cursor::Exhausted;
    }
}
