use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{RawScore, RawStudentRecord};

/// Envelope returned by the platform's user listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<RawStudentRecord>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON payload in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid CSV export in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Anything that can hand the engine a fresh snapshot of user records.
pub trait RecordSource {
    fn fetch(&self) -> impl Future<Output = Result<ApiResponse, SourceError>> + Send;
}

/// Loads a snapshot, degrading every failure to an empty collection.
pub async fn snapshot<S: RecordSource>(source: &S) -> Vec<RawStudentRecord> {
    match source.fetch().await {
        Ok(response) if response.success => {
            info!(records = response.data.len(), "loaded record snapshot");
            response.data
        }
        Ok(_) => {
            warn!("record source reported failure; using empty snapshot");
            Vec::new()
        }
        Err(err) => {
            warn!(error = %err, "failed to load records; using empty snapshot");
            Vec::new()
        }
    }
}

/// A saved API payload: either the `{success, data}` envelope or a bare array.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Envelope(ApiResponse),
    Bare(Vec<RawStudentRecord>),
}

impl RecordSource for JsonFileSource {
    async fn fetch(&self) -> Result<ApiResponse, SourceError> {
        let bytes = read(&self.path).await?;
        let payload: Payload =
            serde_json::from_slice(&bytes).map_err(|source| SourceError::Json {
                path: self.path.clone(),
                source,
            })?;

        Ok(match payload {
            Payload::Envelope(response) => response,
            Payload::Bare(data) => ApiResponse {
                success: true,
                data,
            },
        })
    }
}

/// Flat export with one learner per row; `ficha` holds `;`-separated codes.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    #[serde(rename = "tipoUsuario")]
    tipo_usuario: Option<String>,
    estado: Option<String>,
    nombre: Option<String>,
    apellido: Option<String>,
    documento: Option<String>,
    puntos: Option<String>,
    ficha: Option<String>,
    programa: Option<String>,
    #[serde(rename = "createdAt")]
    created_at: Option<String>,
}

impl From<CsvRow> for RawStudentRecord {
    fn from(row: CsvRow) -> Self {
        let ficha = row
            .ficha
            .as_deref()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            tipo_usuario: row.tipo_usuario,
            estado: row.estado,
            nombre: row.nombre,
            apellido: row.apellido,
            documento: row.documento,
            puntos: row.puntos.map(RawScore::Text),
            ficha,
            programa: row.programa,
            created_at: row.created_at,
        }
    }
}

impl RecordSource for CsvFileSource {
    async fn fetch(&self) -> Result<ApiResponse, SourceError> {
        let bytes = read(&self.path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes.as_slice());

        let mut data = Vec::new();
        for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
            match result {
                Ok(row) => data.push(RawStudentRecord::from(row)),
                Err(err) if err.is_io_error() => {
                    return Err(SourceError::Csv {
                        path: self.path.clone(),
                        source: err,
                    })
                }
                Err(err) => warn!(row = line + 1, error = %err, "skipping malformed CSV row"),
            }
        }

        Ok(ApiResponse {
            success: true,
            data,
        })
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, SourceError> {
    tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static FIXTURES: AtomicUsize = AtomicUsize::new(0);

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wordzy-source-{}-{}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos(),
            FIXTURES.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[tokio::test]
    async fn reads_envelope_payload() {
        let path = temp_file(
            "users.json",
            r#"{"success": true, "data": [{"tipoUsuario": "aprendiz", "puntos": 12}]}"#,
        );
        let response = JsonFileSource::new(&path).fetch().await.expect("fetch succeeds");
        assert!(response.success);
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].puntos, Some(RawScore::Integer(12)));
    }

    #[tokio::test]
    async fn reads_bare_array_payload() {
        let path = temp_file("users.json", r#"[{"nombre": "Ana"}, {"nombre": "Luis"}]"#);
        let records = snapshot(&JsonFileSource::new(&path)).await;
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn failed_envelope_yields_empty_snapshot() {
        let path = temp_file(
            "users.json",
            r#"{"success": false, "data": [{"nombre": "Ana"}]}"#,
        );
        assert!(snapshot(&JsonFileSource::new(&path)).await.is_empty());
    }

    #[tokio::test]
    async fn missing_file_yields_empty_snapshot() {
        let source = JsonFileSource::new("/nonexistent/wordzy/users.json");
        assert!(matches!(source.fetch().await, Err(SourceError::Io { .. })));
        assert!(snapshot(&source).await.is_empty());
    }

    #[tokio::test]
    async fn unreadable_csv_yields_empty_snapshot() {
        let source = CsvFileSource::new("/nonexistent/wordzy/users.csv");
        assert!(matches!(source.fetch().await, Err(SourceError::Io { .. })));
        assert!(snapshot(&source).await.is_empty());
    }

    #[tokio::test]
    async fn reads_csv_export() {
        let path = temp_file(
            "users.csv",
            "tipoUsuario,estado,nombre,apellido,documento,puntos,ficha,programa,createdAt\n\
aprendiz,activo,Laura,Gómez,1034,150,2556678; 2556679,ADSO,2025-03-14\n\
aprendiz,activo,Luis,,1035,,,,\n",
        );
        let response = CsvFileSource::new(&path).fetch().await.expect("fetch succeeds");
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].ficha, vec!["2556678", "2556679"]);
        assert_eq!(
            response.data[0].puntos,
            Some(RawScore::Text("150".to_string()))
        );
        assert!(response.data[1].ficha.is_empty());
    }
}
