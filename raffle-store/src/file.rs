use async_trait::async_trait;
use chrono::{DateTime, Utc};
use raffle_core::{StoreError, TicketStore};
use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};
use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Ticket rows kept as JSON lines in a flat file.
///
/// Targeted updates are done by rewriting the whole file through a temp file
/// and a rename, so readers see either the old table or the new one.
/// Writers inside this process are serialized; nothing coordinates separate
/// processes sharing the same file.
pub struct FlatFileTicketStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FlatFileTicketStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<TicketRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(unavailable(&self.path, e)),
        };

        let mut records = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TicketRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping malformed row {} in {}: {}", line_no + 1, self.path.display(), e),
            }
        }
        Ok(records)
    }

    async fn rewrite(&self, records: &[TicketRecord]) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        let body = encode(records)?;

        fs::write(&tmp, body).await.map_err(|e| write_failed(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(write_failed(&self.path, e));
        }
        Ok(())
    }
}

fn encode(records: &[TicketRecord]) -> Result<String, StoreError> {
    let mut body = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| StoreError::Write(e.to_string()))?;
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}

/// True for an empty file too: there is no row to terminate.
async fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata().await?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1)).await?;
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

fn unavailable(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {}", path.display(), e))
}

fn write_failed(path: &Path, e: std::io::Error) -> StoreError {
    match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => unavailable(path, e),
        _ => StoreError::Write(format!("{}: {}", path.display(), e)),
    }
}

#[async_trait]
impl TicketStore for FlatFileTicketStore {
    async fn read_all(&self) -> Result<Vec<TicketRecord>, StoreError> {
        self.load().await
    }

    async fn append_batch(&self, records: &[TicketRecord]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut body = encode(records)?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| write_failed(&self.path, e))?;

        // A hand edit or an interrupted write can leave the last row unterminated.
        if !ends_with_newline(&mut file).await.map_err(|e| write_failed(&self.path, e))? {
            warn!("{} does not end with a newline; terminating last row", self.path.display());
            body.insert(0, '\n');
        }

        file.write_all(body.as_bytes()).await.map_err(|e| write_failed(&self.path, e))?;
        file.flush().await.map_err(|e| write_failed(&self.path, e))?;
        Ok(())
    }

    async fn update_status(
        &self,
        number: TicketNumber,
        status: TicketStatus,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let mut found = false;
        for record in records.iter_mut().filter(|r| r.number == number) {
            record.status = status;
            found = true;
        }

        if found {
            self.rewrite(&records).await?;
        }
        Ok(found)
    }

    async fn release(
        &self,
        number: TicketNumber,
        held_since: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let before = records.len();
        records.retain(|r| {
            !(r.number == number && r.status == TicketStatus::Reserved && r.timestamp == held_since)
        });

        if records.len() == before {
            return Ok(false);
        }
        self.rewrite(&records).await?;
        Ok(true)
    }

    async fn clear_and_rewrite(&self, records: Vec<TicketRecord>) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.rewrite(&records).await?;
        info!("Rewrote {} with {} rows", self.path.display(), records.len());
        Ok(())
    }
}
