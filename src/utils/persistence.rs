use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use crate::errors::Result;

const TMP_SUFFIX: &str = "tmp";

/// Sibling staging path: `expenses.csv` becomes `expenses.csv.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Replaces `path` atomically: `write` fills a staging file, which is synced
/// and renamed over the target. The staging file is removed when `write` fails.
pub fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&File) -> Result<()>,
{
    let tmp = tmp_path(path);
    let staged = File::create(&tmp).map_err(Into::into).and_then(|file| {
        write(&file)?;
        file.sync_all()?;
        Ok(())
    });
    if let Err(err) = staged {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
