use std::collections::BTreeMap;
use std::ops::Range;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use relative_path::RelativePathBuf;
use review_anchor_config::Config;
use review_anchor_engine::{
    Annotation, AnnotationDraft, AnnotationId, AnnotationStore, EditorState, IndentOptions,
    LineMarker, PlacementOptions, SelectionBoundary, SelectionSnapshot, SourceDocument, io,
};

/// Label separator used when copying lines out of the numbered view
const LABEL_SEPARATOR: &str = "    ";

pub enum Mode {
    Normal,
    /// Typing a comment for a captured selection
    Commenting {
        draft: AnnotationDraft,
        input: String,
    },
}

pub struct App {
    pub path: PathBuf,
    pub file_key: RelativePathBuf,
    pub editor: EditorState,
    pub document: SourceDocument,
    pub store: AnnotationStore,
    /// 1-based line under the cursor
    pub cursor_line: usize,
    /// Other end of a line selection, when one is being extended
    pub selection_anchor: Option<usize>,
    pub scroll: usize,
    pub mode: Mode,
    pub show_popup: bool,
    pub status: String,
    pub author: String,
    pub placement: PlacementOptions,
    pub dirty: bool,
}

impl App {
    pub fn open(path: PathBuf, config: &Config) -> Result<Self> {
        let text = io::read_source(&path)?;
        let annotations = io::load_annotations(&path)?;
        let file_key = path
            .file_name()
            .map(|name| RelativePathBuf::from(name.to_string_lossy().as_ref()))
            .unwrap_or_default();
        Ok(Self::new(path, file_key, &text, annotations, config))
    }

    pub fn new(
        path: PathBuf,
        file_key: RelativePathBuf,
        text: &str,
        annotations: Vec<Annotation>,
        config: &Config,
    ) -> Self {
        let options = IndentOptions {
            sample_lines: config.indent.sample_lines,
            default_width: config.indent.default_width,
        };
        let status = format!("{} annotation(s)", annotations.len());
        let document = SourceDocument::from_text(text);
        let annotations = fit_to_document(annotations, document.len());
        Self {
            path,
            file_key,
            editor: EditorState::with_options(text, options),
            document,
            store: AnnotationStore::from_annotations(annotations),
            cursor_line: 1,
            selection_anchor: None,
            scroll: 0,
            mode: Mode::Normal,
            show_popup: false,
            status,
            author: config.review.author.clone(),
            placement: PlacementOptions {
                padding: config.placement.padding,
                gap: config.placement.gap,
            },
            dirty: false,
        }
    }

    pub fn line_count(&self) -> usize {
        self.document.len().max(1)
    }

    /// Selected lines, inclusive and ordered
    pub fn selected_lines(&self) -> (usize, usize) {
        let anchor = self.selection_anchor.unwrap_or(self.cursor_line);
        (anchor.min(self.cursor_line), anchor.max(self.cursor_line))
    }

    pub fn is_selected(&self, line: usize) -> bool {
        let (start, end) = self.selected_lines();
        (start..=end).contains(&line)
    }

    pub fn markers(&self) -> BTreeMap<usize, LineMarker<'_>> {
        self.store.markers()
    }

    pub fn move_cursor(&mut self, delta: isize, extend: bool) {
        if extend {
            self.selection_anchor.get_or_insert(self.cursor_line);
        } else {
            self.selection_anchor = None;
        }
        let target = self.cursor_line as isize + delta;
        self.cursor_line = target.clamp(1, self.line_count() as isize) as usize;
    }

    pub fn clear_selection(&mut self) {
        self.selection_anchor = None;
        self.show_popup = false;
    }

    /// Keep the cursor inside a window of `height` rows
    pub fn scroll_into_view(&mut self, height: usize) {
        let height = height.max(1);
        let index = self.cursor_line - 1;
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + height {
            self.scroll = index + 1 - height;
        }
    }

    /// Tab / Shift-Tab over the selected lines
    pub fn indent(&mut self, reverse: bool) {
        let (start, end) = self.selected_lines();
        let text = self.editor.text();
        let range = line_byte_range(&text, start).start..line_byte_range(&text, end).end;
        self.editor.set_selection(range);

        let patch = self.editor.apply_tab(reverse);
        if patch.changed.is_empty() {
            self.status = "Nothing to change".to_string();
            return;
        }
        self.document = SourceDocument::from_text(&self.editor.text());
        self.dirty = true;
        self.status = format!(
            "{} line(s) {} (v{})",
            patch.changed.len(),
            if reverse { "outdented" } else { "indented" },
            patch.version
        );
    }

    /// The selected lines as they would be copied from the numbered view
    pub fn selection_text(&self) -> String {
        let (start, end) = self.selected_lines();
        (start..=end)
            .filter_map(|n| self.document.line(n).map(|line| format!("{n}{LABEL_SEPARATOR}{line}")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn start_comment(&mut self) {
        let (start, end) = self.selected_lines();
        let end_chars = self
            .document
            .line(end)
            .map(|line| line.chars().count())
            .unwrap_or(0);
        let snapshot = SelectionSnapshot::new(
            SelectionBoundary::new(start, 0),
            SelectionBoundary::new(end, end_chars),
            self.selection_text(),
        );

        match AnnotationDraft::capture(&self.document, &snapshot, self.file_key.clone()) {
            Some(draft) => {
                self.status = format!(
                    "Commenting on lines {}-{}",
                    draft.range.start_line(),
                    draft.range.end_line()
                );
                self.mode = Mode::Commenting {
                    draft,
                    input: String::new(),
                };
            }
            None => self.status = "Selection cannot be commented on".to_string(),
        }
    }

    pub fn submit_comment(&mut self) {
        let Mode::Commenting { draft, input } =
            std::mem::replace(&mut self.mode, Mode::Normal)
        else {
            return;
        };
        if input.trim().is_empty() {
            self.status = "Empty comment discarded".to_string();
            return;
        }
        self.store
            .submit(draft, self.author.clone(), input.trim(), now_millis());
        self.selection_anchor = None;
        self.dirty = true;
        self.status = "Comment added".to_string();
    }

    pub fn cancel_comment(&mut self) {
        self.mode = Mode::Normal;
        self.status = "Comment cancelled".to_string();
    }

    /// Id of the annotation rendered on the cursor line
    fn primary_on_cursor(&self) -> Option<AnnotationId> {
        self.markers()
            .get(&self.cursor_line)
            .and_then(|marker| marker.primary.id)
    }

    pub fn resolve_current(&mut self) {
        self.change_current("resolved", |store, id| store.resolve(id));
    }

    pub fn reopen_current(&mut self) {
        self.change_current("reopened", |store, id| store.reopen(id));
    }

    pub fn delete_current(&mut self) {
        self.change_current("deleted", |store, id| store.delete(id).map(|_| ()));
    }

    fn change_current(
        &mut self,
        done: &str,
        action: impl FnOnce(
            &mut AnnotationStore,
            AnnotationId,
        ) -> Result<(), review_anchor_engine::StoreError>,
    ) {
        let Some(id) = self.primary_on_cursor() else {
            self.status = "No annotation on this line".to_string();
            return;
        };
        match action(&mut self.store, id) {
            Ok(()) => {
                self.dirty = true;
                self.status = format!("Annotation {done}");
            }
            Err(e) => {
                log::warn!("{e}");
                self.status = e.to_string();
            }
        }
    }

    pub fn save(&mut self) -> Result<()> {
        io::write_source(&self.path, &self.editor.text())?;
        io::save_annotations(&self.path, self.store.annotations())?;
        self.dirty = false;
        self.status = format!("Saved {}", self.path.display());
        Ok(())
    }
}

/// Byte range of a 1-based line in `text`, without its newline
pub fn line_byte_range(text: &str, line: usize) -> Range<usize> {
    let mut start = 0;
    for (index, content) in text.split('\n').enumerate() {
        if index + 1 == line {
            return start..start + content.len();
        }
        start += content.len() + 1;
    }
    text.len()..text.len()
}

/// Pull loaded ranges back inside the document
fn fit_to_document(mut annotations: Vec<Annotation>, line_count: usize) -> Vec<Annotation> {
    for annotation in &mut annotations {
        let fitted = annotation.range.clamped_to(line_count);
        if fitted != annotation.range {
            log::warn!(
                "annotation {:?} spans lines {}..={} beyond line {line_count}; clamped",
                annotation.id,
                annotation.range.start_line(),
                annotation.range.end_line()
            );
            annotation.range = fitted;
        }
    }
    annotations
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
