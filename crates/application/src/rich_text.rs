use docforge_core::{AppError, AppResult};
use docforge_domain::DocumentAst;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SurfaceState {
    AwaitingInitialRender,
    Ready { document: DocumentAst, revision: u64 },
}

/// Editable host of the rendered letter body.
///
/// The surface accepts the template output exactly once through
/// [`RichTextSurface::complete_initial_render`]. Later changes arrive as whole
/// document trees from the editor and bump the revision counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextSurface {
    state: SurfaceState,
    editable: bool,
}

impl Default for RichTextSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextSurface {
    /// Creates a surface waiting for its initial content.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SurfaceState::AwaitingInitialRender,
            editable: false,
        }
    }

    /// Seeds the surface with the rendered template body.
    pub fn complete_initial_render(&mut self, document: DocumentAst) -> AppResult<()> {
        match self.state {
            SurfaceState::AwaitingInitialRender => {
                self.state = SurfaceState::Ready {
                    document,
                    revision: 0,
                };
                Ok(())
            }
            SurfaceState::Ready { .. } => Err(AppError::Conflict(
                "rich-text surface already received its initial render".to_owned(),
            )),
        }
    }

    /// Returns whether the initial render has been applied.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SurfaceState::Ready { .. })
    }

    /// Returns whether edits are accepted.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Toggles Edit/Done. Existing edits are kept either way.
    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    /// Returns the number of edits applied since the initial render.
    #[must_use]
    pub fn revision(&self) -> u64 {
        match &self.state {
            SurfaceState::AwaitingInitialRender => 0,
            SurfaceState::Ready { revision, .. } => *revision,
        }
    }

    /// Replaces the hosted document with the editor's latest tree.
    pub fn apply_edit(&mut self, document: DocumentAst) -> AppResult<&DocumentAst> {
        if !self.editable {
            return Err(AppError::Conflict(
                "document is not in edit mode".to_owned(),
            ));
        }

        match &mut self.state {
            SurfaceState::AwaitingInitialRender => Err(AppError::Conflict(
                "rich-text surface has not been rendered yet".to_owned(),
            )),
            SurfaceState::Ready {
                document: current,
                revision,
            } => {
                *current = document;
                *revision += 1;
                Ok(current)
            }
        }
    }

    /// Returns the current document tree, if rendered.
    #[must_use]
    pub fn document(&self) -> Option<&DocumentAst> {
        match &self.state {
            SurfaceState::AwaitingInitialRender => None,
            SurfaceState::Ready { document, .. } => Some(document),
        }
    }

    /// Clones the current document tree out of the surface.
    pub fn snapshot(&self) -> AppResult<DocumentAst> {
        self.document().cloned().ok_or_else(|| {
            AppError::Conflict("rich-text surface has not been rendered yet".to_owned())
        })
    }
}

#[cfg(test)]
mod tests {
    use docforge_core::AppError;
    use docforge_domain::{BlockNode, DocumentAst, InlineNode};

    use super::RichTextSurface;

    fn body(text: &str) -> DocumentAst {
        DocumentAst::new(vec![BlockNode::paragraph(vec![InlineNode::text(text)])])
    }

    #[test]
    fn initial_render_is_applied_once() {
        let mut surface = RichTextSurface::new();
        assert!(surface.snapshot().is_err());

        surface
            .complete_initial_render(body("first"))
            .unwrap_or_else(|_| unreachable!());
        let second = surface.complete_initial_render(body("second"));

        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(surface.snapshot().ok(), Some(body("first")));
    }

    #[test]
    fn edits_require_edit_mode_and_survive_done() {
        let mut surface = RichTextSurface::new();
        surface
            .complete_initial_render(body("draft"))
            .unwrap_or_else(|_| unreachable!());

        assert!(surface.apply_edit(body("rejected")).is_err());

        surface.set_editable(true);
        surface
            .apply_edit(body("edited"))
            .unwrap_or_else(|_| unreachable!());
        surface.set_editable(false);

        assert_eq!(surface.revision(), 1);
        assert_eq!(surface.document(), Some(&body("edited")));
    }

    #[test]
    fn snapshot_is_detached_from_later_edits() {
        let mut surface = RichTextSurface::new();
        surface
            .complete_initial_render(body("v1"))
            .unwrap_or_else(|_| unreachable!());
        let snapshot = surface.snapshot().unwrap_or_else(|_| unreachable!());

        surface.set_editable(true);
        surface
            .apply_edit(body("v2"))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(snapshot, body("v1"));
    }
}
