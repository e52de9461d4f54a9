use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use super::loader::load_file;
use super::model::CrimeDataset;

/// A dataset loaded once from disk and shared read-only.
///
/// Callers hold `Arc` clones; a reload swaps in a fresh `Arc` and leaves
/// outstanding clones untouched.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    path: PathBuf,
    dataset: Arc<CrimeDataset>,
}

impl DatasetSource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let dataset = Arc::new(load_file(&path)?);
        Ok(DatasetSource { path, dataset })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dataset(&self) -> Arc<CrimeDataset> {
        Arc::clone(&self.dataset)
    }

    /// Re-read the backing file. On failure the previous dataset stays.
    pub fn reload(&mut self) -> Result<()> {
        let fresh = load_file(&self.path)?;
        log::info!("Reloaded {}", self.path.display());
        self.dataset = Arc::new(fresh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const HEADER: &str = "provincia_nombre,anio,codigo_delito_snic_nombre,cantidad_hechos,tasa_hechos,cantidad_victimas_masc,cantidad_victimas_fem,cantidad_victimas_sd";

    #[test]
    fn reload_picks_up_new_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snic.csv");
        fs::write(&path, format!("{HEADER}\nSalta,2020,Robos,10,1.0,1,0,0\n")).unwrap();

        let mut source = DatasetSource::open(&path).unwrap();
        let before = source.dataset();
        assert_eq!(before.len(), 1);

        fs::write(
            &path,
            format!("{HEADER}\nSalta,2020,Robos,10,1.0,1,0,0\nChaco,2021,Hurtos,3,0.5,,,\n"),
        )
        .unwrap();
        source.reload().unwrap();

        assert_eq!(source.dataset().len(), 2);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn failed_reload_keeps_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snic.csv");
        fs::write(&path, format!("{HEADER}\nSalta,2020,Robos,10,1.0,1,0,0\n")).unwrap();
        let mut source = DatasetSource::open(&path).unwrap();

        fs::write(&path, "provincia_nombre\nSalta\n").unwrap();

        assert!(source.reload().is_err());
        assert_eq!(source.dataset().len(), 1);
        assert_eq!(source.dataset().regions(), ["Salta"]);
    }
}
