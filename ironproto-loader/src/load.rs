//! Import-graph traversal.
//!
//! [`Loader`] orchestrates file ingestion: resolve the filename, consult the
//! bundled table, dedup by resolved name, fetch, parse, and repeat for the
//! file's imports until the graph is exhausted. The synchronous driver works
//! an explicit stack; the asynchronous driver keeps an in-flight set of
//! fetches and drains completions on the calling task, so the returned
//! future completes exactly once no matter how completions interleave.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use ironproto_schema::Root;
use tracing::{debug, warn};

use crate::bundled;
use crate::error::{FetchError, LoadError, ParseError, Result};
use crate::path;
use crate::traits::{Fetch, LoadOptions, Parse};

type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = (String, bool, std::result::Result<String, FetchError>)> + Send + 'a>>;

/// Loads schema files into a [`Root`] through a [`Fetch`] collaborator.
pub struct Loader<F> {
    fetcher: F,
    parser: Option<Box<dyn Parse>>,
    options: LoadOptions,
}

impl<F: Fetch> Loader<F> {
    /// Creates a loader over a fetcher. Without a parser, only JSON
    /// descriptor sources can be ingested.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            parser: None,
            options: LoadOptions::default(),
        }
    }

    /// Attaches a `.proto` parse collaborator.
    #[must_use]
    pub fn with_parser(mut self, parser: Box<dyn Parse>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Overrides the load options.
    #[must_use]
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Loads the given files and everything they transitively import.
    ///
    /// Fetches run concurrently; completions are handled one at a time on
    /// this task. The first non-weak failure wins and the remaining
    /// in-flight fetches are discarded. An empty file list completes
    /// immediately with an empty root. The returned root is not resolved;
    /// call [`Root::resolve_all`] before building decoders.
    pub async fn load(&self, files: &[&str]) -> Result<Root> {
        let mut root = Root::new();
        let mut pending: FuturesUnordered<FetchFuture<'_>> = FuturesUnordered::new();

        for file in files {
            self.enqueue(&mut root, &mut pending, file, None, false)?;
        }

        while let Some((filename, weak, fetched)) = pending.next().await {
            let source = match fetched {
                Ok(source) => source,
                Err(err) if weak => {
                    warn!(file = %filename, error = %err, "weak import fetch failed");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match self.ingest(&mut root, &filename, &source) {
                Ok(imports) => {
                    for (import, import_weak) in imports {
                        self.enqueue(&mut root, &mut pending, &import, Some(&filename), import_weak)?;
                    }
                }
                Err(err) if weak => {
                    warn!(file = %filename, error = %err, "weak import parse failed");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(root)
    }

    /// Synchronous counterpart of [`load`](Loader::load).
    ///
    /// # Errors
    /// `SyncNotSupported` if the fetcher has no synchronous primitive.
    pub fn load_sync(&self, files: &[&str]) -> Result<Root> {
        let mut root = Root::new();
        // (filename, origin, weak); initial files in reverse so the first
        // listed file is processed first.
        let mut stack: Vec<(String, Option<String>, bool)> = files
            .iter()
            .rev()
            .map(|f| ((*f).to_string(), None, false))
            .collect();

        while let Some((filename, origin, weak)) = stack.pop() {
            let resolved = match &origin {
                Some(origin) => path::resolve(origin, &filename),
                None => path::normalize(&filename),
            };
            if !self.options.skip_bundled {
                if let Some(canonical) = bundled::bundled_file_name(&resolved) {
                    self.ingest_bundled(&mut root, canonical)?;
                    continue;
                }
            }
            if !root.mark_file(&resolved) {
                debug!(file = %resolved, "already processed");
                continue;
            }
            let fetched = self
                .fetcher
                .fetch_sync(&resolved)
                .ok_or(LoadError::SyncNotSupported)?;
            let source = match fetched {
                Ok(source) => source,
                Err(err) if weak => {
                    warn!(file = %resolved, error = %err, "weak import fetch failed");
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            match self.ingest(&mut root, &resolved, &source) {
                Ok(imports) => {
                    for (import, import_weak) in imports.into_iter().rev() {
                        stack.push((import, Some(resolved.clone()), import_weak));
                    }
                }
                Err(err) if weak => {
                    warn!(file = %resolved, error = %err, "weak import parse failed");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(root)
    }

    /// Resolves one filename and either serves it from the bundled table or
    /// dispatches a fetch. Repeat requests for an already-processed file are
    /// a no-op.
    fn enqueue<'a>(
        &'a self,
        root: &mut Root,
        pending: &mut FuturesUnordered<FetchFuture<'a>>,
        filename: &str,
        origin: Option<&str>,
        weak: bool,
    ) -> Result<()> {
        let resolved = match origin {
            Some(origin) => path::resolve(origin, filename),
            None => path::normalize(filename),
        };
        if !self.options.skip_bundled {
            if let Some(canonical) = bundled::bundled_file_name(&resolved) {
                return self.ingest_bundled(root, canonical);
            }
        }
        if !root.mark_file(&resolved) {
            debug!(file = %resolved, "already processed");
            return Ok(());
        }
        debug!(file = %resolved, weak, "fetching");
        let fetcher = &self.fetcher;
        pending.push(Box::pin(async move {
            let fetched = fetcher.fetch(&resolved).await;
            (resolved, weak, fetched)
        }));
        Ok(())
    }

    /// Ingests a bundled descriptor and, transitively, its bundled imports.
    fn ingest_bundled(&self, root: &mut Root, canonical: &str) -> Result<()> {
        if !root.mark_file(canonical) {
            return Ok(());
        }
        let Some(entry) = bundled::bundled(canonical) else {
            return Ok(());
        };
        debug!(file = canonical, "using bundled descriptor");
        root.add_json(entry.source)?;
        for import in entry.imports {
            self.ingest_bundled(root, import)?;
        }
        Ok(())
    }

    /// Ingests one fetched source: JSON descriptors directly, anything else
    /// through the parse collaborator. Returns the file's imports as
    /// `(name, weak)` pairs in declaration order.
    fn ingest(
        &self,
        root: &mut Root,
        filename: &str,
        source: &str,
    ) -> Result<Vec<(String, bool)>> {
        if source.trim_start().starts_with('{') {
            root.add_json(source)?;
            return Ok(Vec::new());
        }
        let Some(parser) = &self.parser else {
            return Err(ParseError::new(filename, "no .proto parser configured").into());
        };
        let parsed = parser.parse(filename, source, root, &self.options)?;
        let mut imports: Vec<(String, bool)> =
            parsed.imports.into_iter().map(|i| (i, false)).collect();
        imports.extend(parsed.weak_imports.into_iter().map(|i| (i, true)));
        Ok(imports)
    }
}
