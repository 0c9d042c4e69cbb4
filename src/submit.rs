// Submit command: resolve files to one solution, collect the non-empty
// ones and PATCH them to the API.
//
// Everything up to `prepare` is local. No request is built or sent unless
// every file resolved to the same solution and the user owns it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::api::{package_documents, ApiClient, UploadPackage};
use crate::config::EffectiveConfig;
use crate::error::CliError;
use crate::ui::Output;
use crate::workspace::{
    resolve_paths, resolve_solution_dir, Document, MetadataStore, Solution, Workspace,
};

/// `exercism submit FILE...`
#[derive(Debug, Clone)]
pub struct SubmitCommand {
    pub files: Vec<PathBuf>,
}

/// A solution whose files are packaged and ready to send.
pub struct PreparedSubmission {
    pub solution: Solution,
    pub package: UploadPackage,
}

impl SubmitCommand {
    pub fn new(files: Vec<PathBuf>) -> Self {
        SubmitCommand { files }
    }

    /// Run against the workspace named in `cfg`.
    pub fn run<O: Write, E: Write>(
        &self,
        cfg: &EffectiveConfig,
        output: &mut Output<O, E>,
    ) -> Result<(), CliError> {
        cfg.require_token()?;
        let workspace_dir = cfg.require_workspace()?;
        let paths = resolve_paths(&self.files)?;
        let workspace = Workspace::new(workspace_dir)?;
        self.submit(cfg, &workspace, &paths, output)
    }

    /// Run with an explicit metadata store. `paths` must already be
    /// resolved.
    pub fn submit<S: MetadataStore + ?Sized, O: Write, E: Write>(
        &self,
        cfg: &EffectiveConfig,
        store: &S,
        paths: &[PathBuf],
        output: &mut Output<O, E>,
    ) -> Result<(), CliError> {
        let token = cfg.require_token()?;
        let prepared = prepare(store, paths, output)?;
        let client = ApiClient::new(token, &cfg.api_base_url)?;

        let spinner = output.spinner("Submitting...");
        let sent = client.submit_solution(&prepared.solution.id, prepared.package);
        spinner.finish_and_clear();
        sent?;

        output.submitted(&prepared.solution).map_err(CliError::Output)
    }
}

/// Resolve the solution, check ownership, collect and package documents.
pub fn prepare<S: MetadataStore + ?Sized, O: Write, E: Write>(
    store: &S,
    paths: &[PathBuf],
    output: &mut Output<O, E>,
) -> Result<PreparedSubmission, CliError> {
    let dir = resolve_solution_dir(store, paths)?;
    let solution = store.load_solution(&dir)?;
    if !solution.is_requester {
        return Err(CliError::NotRequester {
            exercise: solution.exercise_slug,
            track: solution.track_slug,
        });
    }
    let docs = collect_documents(&dir, paths, output)?;
    let package = package_documents(&docs)?;
    Ok(PreparedSubmission { solution, package })
}

/// Build documents for the non-empty files, warning about each empty one.
pub fn collect_documents<O: Write, E: Write>(
    root: &Path,
    files: &[PathBuf],
    output: &mut Output<O, E>,
) -> Result<Vec<Document>, CliError> {
    let mut docs = Vec::with_capacity(files.len());
    for file in files {
        let info = fs::metadata(file).map_err(|source| CliError::Io {
            path: file.clone(),
            source,
        })?;
        if info.len() == 0 {
            debug!(file = %file.display(), "skipping empty file");
            output.warn_empty_file(file).map_err(CliError::Output)?;
            continue;
        }
        let doc = Document::new(root, file)?;
        debug!(file = doc.path(), "collected document");
        docs.push(doc);
    }
    if docs.is_empty() {
        return Err(CliError::NoFiles);
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, WorkspaceError};
    use crate::workspace::tests::FakeStore;
    use tempfile::tempdir;

    fn config(token: &str, workspace: &Path) -> EffectiveConfig {
        EffectiveConfig {
            token: token.to_string(),
            workspace: workspace.to_path_buf(),
            // Nothing listens here; reaching the network would fail the test.
            api_base_url: "http://127.0.0.1:9/v1".to_string(),
        }
    }

    fn requester_solution() -> Solution {
        Solution {
            id: "abc".into(),
            exercise_slug: "bob".into(),
            track_slug: "rust".into(),
            view_url: "https://exercism.com/tracks/rust/exercises/bob".into(),
            is_requester: true,
            ..Solution::default()
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        store: FakeStore,
    }

    fn fixture(files: &[(&str, &str)], solution: Solution) -> Fixture {
        let tmp = tempdir().unwrap();
        let root = fs::canonicalize(tmp.path()).unwrap().join("rust").join("bob");
        let mut store = FakeStore::default();
        for (name, contents) in files {
            let path = root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, contents).unwrap();
            store.dirs.insert(path, root.clone());
        }
        store.solutions.insert(root.clone(), solution);
        Fixture {
            _tmp: tmp,
            root,
            store,
        }
    }

    #[test]
    fn empty_files_are_skipped_with_warning() {
        let fx = fixture(&[("src/lib.rs", "pub fn hey() {}"), ("empty.rs", "")], requester_solution());
        let paths = vec![fx.root.join("src/lib.rs"), fx.root.join("empty.rs")];
        let mut output = Output::new(Vec::new(), Vec::new());

        let prepared = prepare(&fx.store, &paths, &mut output).unwrap();

        assert_eq!(prepared.package.filenames(), ["src/lib.rs"]);
        let err = String::from_utf8(output.err).unwrap();
        assert!(err.contains("WARNING: Skipping empty file"));
        assert!(err.contains("empty.rs"));
        assert!(output.out.is_empty());
    }

    #[test]
    fn only_empty_files_is_no_files_error() {
        let fx = fixture(&[("a.rs", ""), ("b.rs", "")], requester_solution());
        let paths = vec![fx.root.join("a.rs"), fx.root.join("b.rs")];
        let mut output = Output::new(Vec::new(), Vec::new());

        let err = prepare(&fx.store, &paths, &mut output).err().unwrap();
        assert!(matches!(err, CliError::NoFiles));
        assert!(err.to_string().contains("No files found to submit"));
    }

    #[test]
    fn solution_of_another_account_is_rejected_before_collection() {
        let solution = Solution {
            is_requester: false,
            ..requester_solution()
        };
        let fx = fixture(&[("a.rs", "")], solution);
        let paths = vec![fx.root.join("a.rs")];
        let mut output = Output::new(Vec::new(), Vec::new());

        let err = prepare(&fx.store, &paths, &mut output).err().unwrap();
        assert!(matches!(err, CliError::NotRequester { ref exercise, ref track }
            if exercise == "bob" && track == "rust"));
        // The empty file was never looked at.
        assert!(output.err.is_empty());
    }

    #[test]
    fn missing_metadata_fails_without_request() {
        let tmp = tempdir().unwrap();
        let file = fs::canonicalize(tmp.path()).unwrap().join("lonely.rs");
        fs::write(&file, "x").unwrap();
        let store = FakeStore::default();
        let mut output = Output::new(Vec::new(), Vec::new());

        let err = SubmitCommand::new(vec![file.clone()])
            .submit(&config("t", tmp.path()), &store, &[file], &mut output)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CliError::Workspace(WorkspaceError::MissingMetadata { .. })
        ));
        assert!(output.out.is_empty());
    }

    #[test]
    fn mixed_solutions_fail_before_packaging() {
        let fx = fixture(&[("a.rs", "a")], requester_solution());
        let other_dir = fx.root.parent().unwrap().join("leap");
        let other = other_dir.join("leap.rs");
        fs::create_dir_all(&other_dir).unwrap();
        fs::write(&other, "b").unwrap();
        let mut store = fx.store;
        store.dirs.insert(other.clone(), other_dir);

        let mut output = Output::new(Vec::new(), Vec::new());
        let err = prepare(&store, &[fx.root.join("a.rs"), other], &mut output)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CliError::Workspace(WorkspaceError::DifferentSolutions { .. })
        ));
    }

    #[test]
    fn run_requires_token_then_workspace() {
        let mut output = Output::new(Vec::new(), Vec::new());
        let cmd = SubmitCommand::new(vec![PathBuf::from("whatever.rs")]);

        let err = cmd
            .run(&config("", Path::new("/ws")), &mut output)
            .err()
            .unwrap();
        assert!(matches!(err, CliError::Config(ConfigError::MissingToken { .. })));

        let err = cmd.run(&config("t", Path::new("")), &mut output).err().unwrap();
        assert!(matches!(err, CliError::Config(ConfigError::MissingWorkspace)));
    }

    #[test]
    fn run_rejects_directory_argument() {
        let fx = fixture(&[("a.rs", "a")], requester_solution());
        let mut output = Output::new(Vec::new(), Vec::new());
        let err = SubmitCommand::new(vec![fx.root.clone()])
            .run(&config("t", fx.root.parent().unwrap()), &mut output)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            CliError::Workspace(WorkspaceError::IsDirectory { .. })
        ));
    }
}
