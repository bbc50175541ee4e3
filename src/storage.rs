use crate::model::RosterRequest;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge la requête depuis un support.
    fn load(&self) -> anyhow::Result<RosterRequest>;
    /// Sauvegarde de manière atomique.
    fn save(&self, request: &RosterRequest) -> anyhow::Result<()>;
}

/// Requête persistée dans un fichier JSON.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<RosterRequest> {
        crate::io::load_request_json(&self.path)
    }

    fn save(&self, request: &RosterRequest) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(request)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeekdayRequirement;
    use chrono::Weekday;

    #[test]
    fn save_then_load_keeps_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::open(dir.path().join("nested").join("request.json")).unwrap();
        let mut req = RosterRequest::new(3, 7, Weekday::Wed, WeekdayRequirement::uniform(2), 4);
        req.workers[1].date_off.insert(2);
        req.workers[2].weekly_off.push(Weekday::Fri);
        req.set_special_group(&[0, 1]);

        storage.save(&req).unwrap();
        assert!(storage.exists());
        assert_eq!(storage.load().unwrap(), req);
    }
}
