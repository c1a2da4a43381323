//! Remote best-score sync
//!
//! A shared board holds one number: the best score anyone reached. At
//! startup the game asks for it and adopts it if it beats the local best;
//! a new local best is pushed back. Both directions are fire-and-forget.
//! Results arrive in an inbox that the game polls between frames, so
//! nothing remote ever touches game state directly.

use serde::Deserialize;

/// Best-score exchange with a remote board
pub trait RemoteSync {
    /// Start fetching the remote best. Returns immediately.
    fn request_best(&self);
    /// Remote best, once it has arrived. Each value is handed out once.
    fn take_best(&self) -> Option<u32>;
    /// Push a new best. Returns immediately; failures are only logged.
    fn push_best(&self, score: u32);
}

impl<T: RemoteSync + ?Sized> RemoteSync for Box<T> {
    fn request_best(&self) {
        (**self).request_best()
    }

    fn take_best(&self) -> Option<u32> {
        (**self).take_best()
    }

    fn push_best(&self, score: u32) {
        (**self).push_best(score)
    }
}

/// No remote board configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRemote;

impl RemoteSync for NullRemote {
    fn request_best(&self) {}

    fn take_best(&self) -> Option<u32> {
        None
    }

    fn push_best(&self, _score: u32) {}
}

#[derive(Deserialize)]
struct RemoteBest {
    #[serde(rename = "highScore")]
    high_score: f64,
}

/// Parse the board's `{"highScore": N}` reply
pub fn parse_high_score(json: &str) -> Option<u32> {
    let reply: RemoteBest = serde_json::from_str(json).ok()?;
    if reply.high_score.is_finite() && reply.high_score >= 0.0 {
        Some(reply.high_score as u32)
    } else {
        None
    }
}

/// URL that records `score` on the board
pub fn push_url(base: &str, score: u32) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}score={score}")
}

#[cfg(target_arch = "wasm32")]
pub use web::SheetRemote;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::{JsFuture, spawn_local};

    use super::{RemoteSync, parse_high_score, push_url};

    /// Board behind a plain GET endpoint (e.g. a spreadsheet web app)
    #[derive(Debug, Clone)]
    pub struct SheetRemote {
        url: String,
        inbox: Rc<Cell<Option<u32>>>,
    }

    impl SheetRemote {
        pub fn new(url: impl Into<String>) -> Self {
            Self {
                url: url.into(),
                inbox: Rc::new(Cell::new(None)),
            }
        }
    }

    impl RemoteSync for SheetRemote {
        fn request_best(&self) {
            let url = self.url.clone();
            let inbox = Rc::clone(&self.inbox);
            spawn_local(async move {
                match fetch_text(&url).await {
                    Ok(body) => match parse_high_score(&body) {
                        Some(best) => inbox.set(Some(best)),
                        None => log::warn!("Remote best reply not understood"),
                    },
                    Err(e) => log::warn!("Failed to fetch remote best: {e}"),
                }
            });
        }

        fn take_best(&self) -> Option<u32> {
            self.inbox.take()
        }

        fn push_best(&self, score: u32) {
            let url = push_url(&self.url, score);
            spawn_local(async move {
                match fetch_text(&url).await {
                    Ok(_) => log::info!("Pushed best {score} to remote"),
                    Err(e) => log::warn!("Failed to sync score {score}: {e}"),
                }
            });
        }
    }

    async fn fetch_text(url: &str) -> Result<String, String> {
        let window = web_sys::window().ok_or_else(|| "no window".to_string())?;
        let resp = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(describe)?;
        let resp: web_sys::Response = resp.dyn_into().map_err(describe)?;
        if !resp.ok() {
            return Err(format!("HTTP {}", resp.status()));
        }
        let text = JsFuture::from(resp.text().map_err(describe)?)
            .await
            .map_err(describe)?;
        text.as_string().ok_or_else(|| "non-text body".to_string())
    }

    fn describe(value: JsValue) -> String {
        format!("{value:?}")
    }
}
