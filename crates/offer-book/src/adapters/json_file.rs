use agora_ports::{ArtifactWriter, PortError, PortResult};
use log::{debug, error};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

enum Job {
    Write { name: String, json: String },
    Flush(oneshot::Sender<()>),
}

/// Writes JSON artifacts as `<dir>/<name>.json`
///
/// Background writes are queued to one tokio task, so they land in the order
/// they were requested and never block the caller. Each file is written on
/// the blocking pool to a temporary sibling and renamed into place.
pub struct JsonFileManager {
    dir: PathBuf,
    jobs: UnboundedSender<Job>,
}

impl JsonFileManager {
    /// Start the writer on the current tokio runtime
    pub fn spawn(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let handle = Handle::try_current().map_err(|e| PortError::NoRuntime(e.to_string()))?;
        Ok(Self::spawn_on(handle, dir))
    }

    /// Start the writer on the given runtime
    pub fn spawn_on(handle: Handle, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let (jobs, rx) = mpsc::unbounded_channel();

        handle.spawn(Self::run(dir.clone(), rx));
        debug!("JSON writer started for {}", dir.display());

        Self { dir, jobs }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Wait until every background write requested so far has finished
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.jobs.send(Job::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }

    async fn run(dir: PathBuf, mut jobs: UnboundedReceiver<Job>) {
        while let Some(job) = jobs.recv().await {
            match job {
                Job::Write { name, json } => {
                    let target = dir.clone();
                    let artifact = name.clone();
                    let written = tokio::task::spawn_blocking(move || {
                        write_json_file(&target, &artifact, &json)
                    })
                    .await;
                    match written {
                        Ok(Ok(path)) => debug!("Wrote {}", path.display()),
                        Ok(Err(err)) => {
                            error!("Writing '{}' to {} failed: {}", name, dir.display(), err)
                        }
                        Err(err) => error!("Writer task for '{}' failed: {}", name, err),
                    }
                }
                Job::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("JSON writer for {} stopped", dir.display());
    }
}

impl ArtifactWriter for JsonFileManager {
    fn write(&self, json: &str, name: &str) -> PortResult<PathBuf> {
        write_json_file(&self.dir, name, json)
    }

    fn write_in_background(&self, json: String, name: &str) {
        let job = Job::Write {
            name: name.to_string(),
            json,
        };
        if self.jobs.send(job).is_err() {
            error!(
                "JSON writer for {} is gone, dropping '{}'",
                self.dir.display(),
                name
            );
        }
    }
}

/// Write `json` to `<dir>/<name>.json`, creating `dir` if needed
pub fn write_json_file(dir: &Path, name: &str, json: &str) -> PortResult<PathBuf> {
    validate_name(name)?;
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{}.json", name));
    let tmp = dir.join(format!("{}.json.tmp", name));
    fs::write(&tmp, json)?;
    fs::rename(&tmp, &path)?;
    Ok(path)
}

fn validate_name(name: &str) -> PortResult<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control());
    if invalid {
        return Err(PortError::InvalidArtifactName(name.to_string()));
    }
    Ok(())
}
