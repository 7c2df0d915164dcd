//! Shared primitives used across the dreamscape crates.
//!
//! ```rust
//! use dcommon::{GenerationOptions, SessionId};
//!
//! let session = SessionId::from("dreamer-1");
//! let options = GenerationOptions::default().with_temperature(0.7).with_top_k(40);
//!
//! assert_eq!(session.as_str(), "dreamer-1");
//! assert_eq!(options.top_k, Some(40));
//! ```

pub mod future {
    //! Boxed future alias shared by the async trait seams.
    //!
    //! ```rust
    //! use dcommon::BoxFuture;
    //!
    //! fn caption_len<'a>(caption: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { caption.len() })
    //! }
    //!
    //! let _future = caption_len("a moonlit library");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Conversation session identifier.

    use std::fmt::{Display, Formatter};

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    pub struct SessionId(String);

    impl SessionId {
        pub fn new(value: impl Into<String>) -> Self {
            Self(value.into())
        }

        pub fn as_str(&self) -> &str {
            self.0.as_str()
        }
    }

    impl Display for SessionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<String> for SessionId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }

    impl From<&str> for SessionId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }
}

pub mod model {
    //! Sampling settings forwarded to the generative model.
    //!
    //! ```rust
    //! use dcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.9)
    //!     .with_top_p(1.0)
    //!     .with_max_output_tokens(800);
    //!
    //! assert_eq!(options.temperature, Some(0.9));
    //! assert_eq!(options.max_output_tokens, Some(800));
    //! assert!(!options.is_empty());
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub top_k: Option<u32>,
        pub top_p: Option<f32>,
        pub max_output_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_top_k(mut self, top_k: u32) -> Self {
            self.top_k = Some(top_k);
            self
        }

        pub fn with_top_p(mut self, top_p: f32) -> Self {
            self.top_p = Some(top_p);
            self
        }

        pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
            self.max_output_tokens = Some(max_output_tokens);
            self
        }

        pub fn is_empty(&self) -> bool {
            self.temperature.is_none()
                && self.top_k.is_none()
                && self.top_p.is_none()
                && self.max_output_tokens.is_none()
        }
    }
}

pub mod lines {
    //! Line splitter for text protocols that arrive in arbitrary byte chunks.
    //!
    //! ```rust
    //! use dcommon::LineSplitter;
    //!
    //! let mut lines = LineSplitter::default();
    //! assert!(lines.push(b"data: caf\xC3").is_empty());
    //! assert_eq!(lines.push(b"\xA9\r\nda"), vec!["data: caf\u{e9}".as_bytes().to_vec()]);
    //! assert_eq!(lines.finish(), Some(b"da".to_vec()));
    //! ```

    /// Buffers bytes until a `\n` arrives. Lines are returned as raw bytes
    /// without their `\n` or `\r\n` terminator, so a split inside a multi-byte
    /// character is reassembled before the caller decodes it.
    #[derive(Debug, Default)]
    pub struct LineSplitter {
        pending: Vec<u8>,
    }

    impl LineSplitter {
        pub fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
            self.pending.extend_from_slice(bytes);
            let mut lines = Vec::new();

            while let Some(newline) = self.pending.iter().position(|byte| *byte == b'\n') {
                let mut line = self.pending.drain(..=newline).collect::<Vec<_>>();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                lines.push(line);
            }

            lines
        }

        /// Takes the unterminated tail left when the input closed.
        pub fn finish(&mut self) -> Option<Vec<u8>> {
            let mut tail = std::mem::take(&mut self.pending);
            if tail.last() == Some(&b'\r') {
                tail.pop();
            }
            (!tail.is_empty()).then_some(tail)
        }

        pub fn is_empty(&self) -> bool {
            self.pending.is_empty()
        }
    }
}

pub use context::SessionId;
pub use future::BoxFuture;
pub use lines::LineSplitter;
pub use model::GenerationOptions;
