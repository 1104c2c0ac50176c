use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::engine::{EngineFactory, EngineOutput, SearchEngine};
use super::framing::{Request, Response, read_frame, write_frame};
use crate::loader::ResourceBundle;

struct FramedIo<R, W> {
    reader: R,
    writer: W,
    next_id: u64,
}

/// Engine reached through length-prefixed JSON frames over a reader/writer pair.
///
/// Each exchange runs in its own task and always reads its response frame to
/// the end, so a caller that stops waiting (timeout) leaves the stream aligned.
pub struct FramedEngine<R, W> {
    io: Arc<Mutex<FramedIo<R, W>>>,
}

impl<R, W> fmt::Debug for FramedEngine<R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramedEngine").finish_non_exhaustive()
    }
}

impl<R, W> FramedEngine<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Arc::new(Mutex::new(FramedIo {
                reader,
                writer,
                next_id: 0,
            })),
        }
    }

    /// Hand the four resources to the engine
    pub async fn init(&self, bundle: &ResourceBundle) -> Result<()> {
        self.call(
            "init",
            json!({
                "pu": bundle.pu,
                "nimi_pu": bundle.nimi_pu,
                "compounds": bundle.compounds,
                "model": bundle.model,
            }),
        )
        .await
        .context("Engine rejected init")?;
        Ok(())
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let io = Arc::clone(&self.io);
        let method = method.to_string();

        // Detached from the caller: dropping this future must not cut a
        // frame in half, so the exchange finishes in the background.
        tokio::spawn(async move { io.lock().await.exchange(method, params).await })
            .await
            .context("Engine exchange task failed")?
    }
}

impl<R, W> FramedIo<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn exchange(&mut self, method: String, params: Value) -> Result<Value> {
        self.next_id += 1;
        let id = self.next_id;

        let request = Request { id, method, params };
        write_frame(&mut self.writer, &request).await?;

        loop {
            let response: Response = read_frame(&mut self.reader).await?;

            // Answers to requests the engine skipped or repeated
            if response.id < id {
                debug!("Discarding late engine response {}", response.id);
                continue;
            }
            if response.id != id {
                anyhow::bail!(
                    "Engine answered request {} while {} was pending",
                    response.id,
                    id
                );
            }

            if let Some(error) = response.error {
                anyhow::bail!("Engine error: {error}");
            }
            return response
                .result
                .ok_or_else(|| anyhow::anyhow!("Engine response {id} has neither result nor error"));
        }
    }
}

#[async_trait]
impl<R, W> SearchEngine for FramedEngine<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn search(&self, query: &str) -> Result<EngineOutput> {
        let output = match self.call("search", json!({ "query": query })).await? {
            Value::String(json) => json,
            // Some engines inline the array instead of a serialized string
            other => other.to_string(),
        };
        Ok(EngineOutput::Json(output))
    }
}

/// Engine running as a child process, speaking frames on stdin/stdout.
#[derive(Debug)]
pub struct ProcessEngine {
    // Spawned with `kill_on_drop`; held so the process lives as long as the engine
    _child: Child,
    framed: FramedEngine<ChildStdout, ChildStdin>,
}

#[async_trait]
impl SearchEngine for ProcessEngine {
    async fn search(&self, query: &str) -> Result<EngineOutput> {
        self.framed.search(query).await
    }
}

/// Spawns `program args...` and initializes it with the resource bundle.
#[derive(Debug, Clone)]
pub struct ProcessEngineFactory {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessEngineFactory {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl EngineFactory for ProcessEngineFactory {
    async fn construct(&self, bundle: &ResourceBundle) -> Result<Box<dyn SearchEngine>> {
        info!("Starting engine process {:?} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn engine {:?}", self.program))?;

        let stdin = child.stdin.take().context("Engine stdin was not captured")?;
        let stdout = child.stdout.take().context("Engine stdout was not captured")?;

        let engine = ProcessEngine {
            _child: child,
            framed: FramedEngine::new(stdout, stdin),
        };
        engine.framed.init(bundle).await?;

        Ok(Box::new(engine))
    }
}
