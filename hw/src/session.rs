//! A collection session: the canvas, the label it belongs to, and the dataset behind them.
//!
//! The canvas is committed to the store at well-defined moments only: when switching labels, on
//! an explicit [Session::commit], and before anything is exported. Switching away from a canvas
//! that hasn't changed since it was shown commits nothing, so visiting a label doesn't mark it as
//! saved-but-empty.

use crate::{
    canvas::{Canvas, StylusEvent, Tool},
    config::Config,
    dataset::{Dataset, Label, LabelStatus},
    error::{HwErrorExt, Result},
    store::DatasetStore,
    stroke::Drawing,
};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Session {
    config: Config,
    store: DatasetStore,
    canvas: Canvas,
    current: Label,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self::with_dataset(config, Dataset::new())
    }

    pub fn with_dataset(config: Config, dataset: Dataset) -> Self {
        let current = Label::new(config.start_label());
        tracing::info!("start session on {current}");

        let store = DatasetStore::with_dataset(dataset);
        let mut canvas = Canvas::new(config.eraser_radius);
        canvas.load_drawing(store.get_drawing(current.as_str()));

        Session {
            config,
            store,
            canvas,
            current,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn current_label(&self) -> &Label {
        &self.current
    }

    /// Labels offered for collection, in toolbar order.
    pub fn labels(&self) -> &[String] {
        &self.config.alphabet
    }

    pub fn label_status(&self, label: &str) -> LabelStatus {
        self.store.status(label)
    }

    pub fn missing_labels(&self) -> Vec<String> {
        self.store.with(|dataset| {
            dataset
                .missing(&self.config.alphabet)
                .into_iter()
                .map(String::from)
                .collect()
        })
    }

    pub fn set_tool(&mut self, tool: Tool) {
        tracing::debug!("tool {tool:?}");
        self.canvas.tool = tool;
    }

    pub fn handle(&mut self, event: StylusEvent) {
        self.canvas.handle(event);
    }

    pub fn undo(&mut self) {
        self.canvas.undo();
    }

    pub fn redo(&mut self) {
        self.canvas.redo();
    }

    pub fn remove_all_strokes(&mut self) {
        self.canvas.clear();
    }

    /// Store the canvas under the current label, modified or not.
    pub fn commit(&mut self) {
        self.canvas.end_stroke();
        self.store
            .commit(self.current.clone(), self.canvas.to_drawing());
        self.canvas.mark_committed();
    }

    fn commit_if_modified(&mut self) {
        self.canvas.end_stroke();
        if self.canvas.modified() {
            self.commit();
        }
    }

    pub fn select_label(&mut self, label: impl Into<Label>) {
        let label = label.into();
        self.commit_if_modified();

        tracing::info!("select {label}");
        self.canvas
            .load_drawing(self.store.get_drawing(label.as_str()));
        self.current = label;
    }

    pub fn drawing(&self, label: &str) -> Drawing {
        self.store.get_drawing(label)
    }

    fn reload_canvas(&mut self) {
        if self.canvas.modified() {
            tracing::warn!(
                "dropping uncommitted strokes for {} in favor of imported data",
                self.current
            );
        }

        self.canvas
            .load_drawing(self.store.get_drawing(self.current.as_str()));
    }

    /// Replace the dataset with the one in `path`. On error nothing changes, canvas included.
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.store.load(path)?;
        self.reload_canvas();
        Ok(())
    }

    pub fn import_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.store.load_bytes(bytes)?;
        self.reload_canvas();
        Ok(())
    }

    pub fn save(&mut self) -> Result<Vec<u8>> {
        self.commit_if_modified();
        self.store.save()
    }

    pub fn export(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.commit_if_modified();
        self.store.export(path, self.config.pretty_export)
    }

    /// Export to the temp directory under the configured name, for sharing.
    pub fn export_to_temp(&mut self) -> Result<PathBuf> {
        self.commit_if_modified();
        self.store
            .export_to_temp(&self.config.export_file_name, self.config.pretty_export)
    }

    /// Like [Session::import], but logs the failure instead of returning it.
    pub fn import_or_report(&mut self, path: impl AsRef<Path>) -> bool {
        match self.import(path) {
            Ok(()) => true,
            Err(err) => {
                err.display();
                false
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stroke::StrokeElement;

    fn config() -> Config {
        Config::with_alphabet(["a", "b", "c"].map(String::from).to_vec())
    }

    fn scribble(session: &mut Session, x: f32) {
        session.handle(StylusEvent::Down(StrokeElement::new(x, 0.)));
        session.handle(StylusEvent::Move(StrokeElement::new(x + 1., 1.)));
        session.handle(StylusEvent::Up);
    }

    #[test]
    fn switching_commits_modified() {
        let mut session = Session::new(config());
        assert_eq!(session.current_label().as_str(), "a");

        scribble(&mut session, 0.);
        assert_eq!(session.label_status("a"), LabelStatus::Missing);

        session.select_label("b");
        assert_eq!(session.label_status("a"), LabelStatus::Collected(1));
        assert!(session.canvas().to_drawing().is_empty());

        session.select_label("a");
        assert_eq!(session.canvas().to_drawing(), session.drawing("a"));
    }

    #[test]
    fn visiting_commits_nothing() {
        let mut session = Session::new(config());
        session.select_label("b");
        session.select_label("c");
        assert_eq!(session.label_status("a"), LabelStatus::Missing);
        assert_eq!(session.label_status("b"), LabelStatus::Missing);
        assert_eq!(session.missing_labels(), ["a", "b", "c"]);
    }

    #[test]
    fn clearing_commits_empty() {
        let mut session = Session::new(config());
        scribble(&mut session, 0.);
        session.commit();
        assert_eq!(session.label_status("a"), LabelStatus::Collected(1));

        session.remove_all_strokes();
        session.select_label("b");
        assert_eq!(session.label_status("a"), LabelStatus::Empty);
    }

    #[test]
    fn in_progress_stroke_finished_on_commit() {
        let mut session = Session::new(config());
        session.handle(StylusEvent::Down(StrokeElement::new(0., 0.)));
        session.select_label("b");
        assert_eq!(session.label_status("a"), LabelStatus::Collected(1));
    }

    #[test]
    fn export_commits_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let mut session = Session::new(config());
        scribble(&mut session, 3.);
        session.export(&path).unwrap();

        let dataset = Dataset::load(&path).unwrap();
        assert_eq!(dataset.status("a"), LabelStatus::Collected(1));
    }

    #[test]
    fn import_reloads_canvas() {
        let mut session = Session::new(config());
        session
            .import_bytes(br#"{"a": [[{"x": 1, "y": 2}], [{"x": 3, "y": 4}]]}"#)
            .unwrap();
        assert_eq!(session.canvas().to_drawing().len(), 2);
        assert!(!session.canvas().modified());
    }

    #[test]
    fn import_replaces_uncommitted_strokes() {
        let mut session = Session::new(config());
        scribble(&mut session, 0.);
        assert!(session.canvas().modified());

        session
            .import_bytes(br#"{"a": [], "b": [[{"x": 1, "y": 2}]]}"#)
            .unwrap();
        assert!(session.canvas().to_drawing().is_empty());
        assert!(!session.canvas().modified());
        assert_eq!(session.label_status("a"), LabelStatus::Empty);
        assert_eq!(session.label_status("b"), LabelStatus::Collected(1));
    }

    #[test]
    fn failed_import_changes_nothing() {
        let mut session = Session::new(config());
        scribble(&mut session, 0.);
        session.commit();
        scribble(&mut session, 5.);

        let err = session.import_bytes(b"{\"a\": [[").unwrap_err();
        assert!(err.kind().is_decode());
        assert_eq!(session.label_status("a"), LabelStatus::Collected(1));
        assert_eq!(session.canvas().to_drawing().len(), 2);

        let dir = tempfile::tempdir().unwrap();
        assert!(!session.import_or_report(dir.path().join("gone.json")));
        assert_eq!(session.canvas().to_drawing().len(), 2);
    }

    #[test]
    fn undo_back_to_committed_is_unmodified() {
        let mut session = Session::new(config());
        scribble(&mut session, 0.);
        session.commit();
        scribble(&mut session, 1.);
        session.undo();
        session.select_label("b");
        assert_eq!(session.label_status("a"), LabelStatus::Collected(1));
    }

    #[test]
    fn save_bytes_round_trip() {
        let mut session = Session::new(config());
        scribble(&mut session, 0.);
        session.select_label("b");
        scribble(&mut session, 2.);

        let bytes = session.save().unwrap();
        let mut other = Session::new(config());
        other.import_bytes(&bytes).unwrap();
        assert_eq!(other.store().snapshot(), session.store().snapshot());
    }
}
