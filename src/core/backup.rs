use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally replacing it with a
    /// zip archive. Returns the path of the file that was kept.
    pub fn backup(
        pool: &mut DbPool,
        db_path: &str,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Database not found: {}", src.display()),
            )));
        }
        if !dest.is_absolute() {
            return Err(AppError::Validation(format!(
                "Backup file path must be absolute: {dest_file}"
            )));
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        ensure_writable(dest, force)?;

        fs::copy(src, dest)?;
        success(format!("Backup created: {}", dest.display()));

        let final_path = if compress {
            let compressed = compress_backup(dest)?;
            if let Err(e) = fs::remove_file(dest) {
                warning(format!("Failed to remove uncompressed backup: {e}"));
            } else {
                info(format!("Removed uncompressed backup: {}", dest.display()));
            }
            compressed
        } else {
            dest.to_path_buf()
        };

        ttlog(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        )?;

        Ok(final_path)
    }
}

/// Compress a backup into `<name>.zip` next to it.
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rexpenses.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry, options)
        .map_err(|e| AppError::Other(format!("zip: {e}")))?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish()
        .map_err(|e| AppError::Other(format!("zip: {e}")))?;

    success(format!("Compressed: {}", zip_path.display()));

    Ok(zip_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn backup_copies_and_compresses() {
        let dir = env::temp_dir().join("rexpenses_backup_unit");
        fs::create_dir_all(&dir).unwrap();
        let db = dir.join("src.sqlite");
        let out = dir.join("copy.sqlite");
        fs::remove_file(&db).ok();
        fs::remove_file(dir.join("copy.zip")).ok();

        let mut pool = DbPool::new(db.to_str().unwrap()).unwrap();
        crate::db::initialize::init_db(&pool.conn).unwrap();

        let kept = BackupLogic::backup(
            &mut pool,
            db.to_str().unwrap(),
            out.to_str().unwrap(),
            true,
            true,
        )
        .unwrap();

        assert_eq!(kept, dir.join("copy.zip"));
        assert!(kept.exists());
        assert!(!out.exists());
    }

    #[test]
    fn relative_destination_is_rejected() {
        let dir = env::temp_dir().join("rexpenses_backup_rel");
        fs::create_dir_all(&dir).unwrap();
        let db = dir.join("src.sqlite");
        let mut pool = DbPool::new(db.to_str().unwrap()).unwrap();

        let err = BackupLogic::backup(&mut pool, db.to_str().unwrap(), "rel.sqlite", false, true)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
