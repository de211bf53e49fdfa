use derive_new::new;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Eq, new)]
pub struct FileSpec {
    pub path: PathBuf,
    pub content: String,
}

impl PartialEq for FileSpec {
    fn eq(&self, other: &Self) -> bool {
        self.path.file_name() == other.path.file_name()
    }
}

pub fn write_file(file_spec: FileSpec) {
    if let Some(parent) = file_spec.path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
    }

    std::fs::write(&file_spec.path, &file_spec.content)
        .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", file_spec.path, e));
}

/// Write `files_count` files with generated names and content into `dir`.
///
/// Names carry an index suffix so generated words can never collide.
pub fn write_generated_files(dir: &Path, files_count: usize) -> Vec<FileSpec> {
    use fake::faker::lorem::en::{Word, Words};
    use fake::Fake;

    (0..files_count)
        .map(|index| {
            let file_name = format!("{}_{}.txt", Word().fake::<String>(), index);
            let file_path = dir.join(&file_name);
            let file_content = Words(5..10).fake::<Vec<String>>().join(" ");

            let file_spec = FileSpec::new(file_path, file_content);
            write_file(file_spec.clone());

            file_spec
        })
        .collect::<Vec<_>>()
}
