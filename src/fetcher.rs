use reqwest::StatusCode;
use reqwest::blocking::{Client, ClientBuilder};
use reqwest::redirect;
use thiserror::Error;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that can turn a URL into page markup.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

fn client_builder() -> ClientBuilder {
    let custom_redirect_policy = redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > 100 {
            attempt.error("Too many redirects (>100)")
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .redirect(custom_redirect_policy)
        .user_agent(USER_AGENT)
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_builder(client_builder())
    }

    fn with_builder(builder: ClientBuilder) -> Result<Self, reqwest::Error> {
        Ok(HttpFetcher { client: builder.build()? })
    }
}

impl Fetch for HttpFetcher {
    /// Single GET, no retry. Anything but 200 is a failure.
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |source| FetchError::Transport { url: url.to_string(), source };

        let resp = self.client.get(url).send().map_err(transport)?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status { url: url.to_string(), status });
        }

        resp.text().map_err(transport)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{Fetch, FetchError};
    use reqwest::StatusCode;

    /// Serves canned pages and remembers every URL asked for.
    #[derive(Default)]
    pub struct FakeFetcher {
        pages: HashMap<String, String>,
        pub requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requested.borrow().clone()
        }
    }

    impl Fetch for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }
}
