//! The open document.
//!
//! [`Main`] is the root of everything the user edits: the stage, the scenes
//! defined on it, and the undo history. The window manager treats it as
//! opaque apart from the dirty check, saving and undo pushes.

use crate::path::PrimPath;
use crate::stage::{AttrValue, MemoryStage, Stage, StageError};

pub const SCENES_ROOT: &str = "/Scenes";
pub const WORKSPACES_ROOT: &str = "/Workspaces";
pub const WINDOWS_ROOT: &str = "/Windows";

/// Relationship from a workspace to the screens it owns.
pub const REL_SCREEN: &str = "screen";
/// Relationship from a screen to its areas.
pub const REL_AREAS: &str = "areas";
/// Token attribute naming an area's editor type.
pub const ATTR_SPACE_TYPE: &str = "spacetype";

#[derive(Debug, Clone, PartialEq)]
pub struct UndoStep {
    pub name: String,
}

/// Default layout created for a fresh document.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultLayout {
    pub scene: PrimPath,
    pub workspace: PrimPath,
    pub screen: PrimPath,
}

pub struct Main {
    stage: Box<dyn Stage>,
    scenes: Vec<PrimPath>,
    undo_stack: Vec<UndoStep>,
}

impl Main {
    pub fn new(stage: Box<dyn Stage>) -> Self {
        Self {
            stage,
            scenes: Vec::new(),
            undo_stack: Vec::new(),
        }
    }

    /// Builds a document on an in-memory stage holding one scene and one
    /// workspace with a single 3D view area. The result starts clean.
    pub fn with_default_layout(mut stage: MemoryStage) -> (Self, DefaultLayout) {
        let scene = PrimPath::new(SCENES_ROOT).child("Scene");
        let workspace = PrimPath::new(WORKSPACES_ROOT).child("Layout");
        let screen = workspace.child("Screen");
        let area = screen.child("Area_0");

        stage.define_prim(&scene, "Scene");
        stage.define_prim(&workspace, "WorkSpace");
        stage.define_prim(&screen, "Screen");
        stage.define_prim(&area, "Area");
        let linked = stage
            .set_attribute(&area, ATTR_SPACE_TYPE, AttrValue::Token("view3d".into()))
            .and_then(|_| stage.add_relationship_target(&screen, REL_AREAS, area.clone()))
            .and_then(|_| stage.add_relationship_target(&workspace, REL_SCREEN, screen.clone()));
        if let Err(e) = linked {
            tracing::error!("Failed to build default layout: {e}");
        }
        stage.mark_clean();

        let mut main = Self::new(Box::new(stage));
        main.scenes.push(scene.clone());
        (
            main,
            DefaultLayout {
                scene,
                workspace,
                screen,
            },
        )
    }

    pub fn stage(&self) -> &dyn Stage {
        self.stage.as_ref()
    }

    pub fn stage_mut(&mut self) -> &mut dyn Stage {
        self.stage.as_mut()
    }

    pub fn scenes(&self) -> &[PrimPath] {
        &self.scenes
    }

    pub fn add_scene(&mut self, path: PrimPath) {
        self.stage.define_prim(&path, "Scene");
        if !self.scenes.contains(&path) {
            self.scenes.push(path);
        }
    }

    pub fn has_scene(&self, path: &PrimPath) -> bool {
        self.scenes.contains(path)
    }

    pub fn is_dirty(&self) -> bool {
        self.stage.is_dirty()
    }

    pub fn save(&mut self) -> Result<(), StageError> {
        self.stage.save()
    }

    pub fn undo_push(&mut self, name: &str) {
        tracing::trace!("Undo push: {name}");
        self.undo_stack.push(UndoStep {
            name: name.to_owned(),
        });
    }

    pub fn undo_steps(&self) -> &[UndoStep] {
        &self.undo_stack
    }
}

impl std::fmt::Debug for Main {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Main")
            .field("scenes", &self.scenes)
            .field("dirty", &self.is_dirty())
            .field("undo_steps", &self.undo_stack.len())
            .finish()
    }
}
