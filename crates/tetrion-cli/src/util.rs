use std::{
    fs::{self, File},
    io::{self, BufWriter, Write as _},
    path::Path,
};

use anyhow::Context;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Writes `value` as pretty-printed JSON, creating missing parent directories.
pub fn write_json_file<T, P>(file_kind: &str, path: P, value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create {} file: {}", file_kind, path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
    writeln!(writer)
        .with_context(|| format!("Failed to write newline after JSON to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, env, process};

    use super::*;

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = env::temp_dir().join(format!("tetrion-util-{}", process::id()));
        let path = dir.join("nested").join("value.json");
        let value = BTreeMap::from([("score", 1200), ("lines", 4)]);

        write_json_file("test", &path, &value).unwrap();
        let read: BTreeMap<String, i32> = read_json_file("test", &path).unwrap();
        assert_eq!(read["score"], 1200);
        assert_eq!(read["lines"], 4);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_reports_file_kind_and_path() {
        let path = env::temp_dir().join("tetrion-util-missing").join("none.json");
        let err = read_json_file::<serde_json::Value, _>("save", &path).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to open save file"), "{message}");
        assert!(message.contains("none.json"), "{message}");
    }
}
