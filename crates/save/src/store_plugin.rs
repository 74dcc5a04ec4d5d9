use std::path::PathBuf;

use bevy::prelude::*;
use schematic::{BlueprintLibrary, Clipboard};

use crate::save_error::SaveError;
use crate::store::BlueprintStore;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Which in-memory blueprint an export writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSource {
    Clipboard,
    Library(String),
}

/// Write a blueprint to the store under `name`.
#[derive(Event, Debug, Clone)]
pub struct ExportBlueprint {
    pub source: ExportSource,
    pub name: String,
}

/// Read a stored blueprint into the library (and optionally the clipboard).
#[derive(Event, Debug, Clone)]
pub struct ImportBlueprint {
    pub name: String,
    pub make_active: bool,
}

#[derive(Event, Debug, Clone)]
pub struct BlueprintExported {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Event, Debug, Clone)]
pub struct BlueprintImported {
    pub name: String,
    pub cells: usize,
}

#[derive(Event, Debug, Clone)]
pub struct StoreFailed {
    pub name: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Connects the clipboard and library to a `BlueprintStore` on disk.
pub struct StorePlugin {
    pub root: PathBuf,
}

impl Plugin for StorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(BlueprintStore::new(self.root.clone()))
            .init_resource::<Clipboard>()
            .init_resource::<BlueprintLibrary>()
            .add_event::<ExportBlueprint>()
            .add_event::<ImportBlueprint>()
            .add_event::<BlueprintExported>()
            .add_event::<BlueprintImported>()
            .add_event::<StoreFailed>()
            .add_systems(Update, (handle_export, handle_import).chain());
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn handle_export(
    mut requests: EventReader<ExportBlueprint>,
    store: Res<BlueprintStore>,
    clipboard: Res<Clipboard>,
    library: Res<BlueprintLibrary>,
    mut exported: EventWriter<BlueprintExported>,
    mut failed: EventWriter<StoreFailed>,
) {
    for req in requests.read() {
        let blueprint = match &req.source {
            ExportSource::Clipboard => clipboard.get_active(),
            ExportSource::Library(key) => library.load(key),
        };
        let result = match blueprint {
            Some(bp) => store.save(&req.name, bp),
            None => Err(SaveError::NotFound(match &req.source {
                ExportSource::Clipboard => "<clipboard>".to_string(),
                ExportSource::Library(key) => key.clone(),
            })),
        };
        match result {
            Ok(path) => {
                exported.send(BlueprintExported {
                    name: req.name.clone(),
                    path,
                });
            }
            Err(e) => {
                warn!("Export of '{}' failed: {e}", req.name);
                failed.send(StoreFailed {
                    name: req.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

fn handle_import(
    mut requests: EventReader<ImportBlueprint>,
    store: Res<BlueprintStore>,
    mut clipboard: ResMut<Clipboard>,
    mut library: ResMut<BlueprintLibrary>,
    mut imported: EventWriter<BlueprintImported>,
    mut failed: EventWriter<StoreFailed>,
) {
    for req in requests.read() {
        match store.load(&req.name) {
            Ok(bp) => {
                let cells = bp.cell_count();
                if req.make_active {
                    clipboard.set_active(bp.clone());
                }
                library.save(req.name.clone(), bp);
                info!("Imported blueprint '{}' ({} cells)", req.name, cells);
                imported.send(BlueprintImported {
                    name: req.name.clone(),
                    cells,
                });
            }
            Err(e) => {
                warn!("Import of '{}' failed: {e}", req.name);
                failed.send(StoreFailed {
                    name: req.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::event::Events;
    use schematic::{Blueprint, Cardinal, CellPos, CellState};

    fn app(name: &str) -> App {
        let root = std::env::temp_dir().join(format!("schematic_store_plugin_{name}"));
        let _ = std::fs::remove_dir_all(&root);
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(StorePlugin { root });
        app.update();
        app
    }

    fn drain<E: Event + Clone>(app: &mut App) -> Vec<E> {
        app.world_mut()
            .resource_mut::<Events<E>>()
            .drain()
            .collect()
    }

    fn pillar() -> Blueprint {
        let mut bp = Blueprint::new("pillar", Cardinal::East);
        bp.insert_cell(CellPos::new(0, 0, 0), CellState::plain("quartz"));
        bp.insert_cell(CellPos::new(0, 1, 0), CellState::plain("quartz"));
        bp
    }

    #[test]
    fn test_export_clipboard_then_import_into_library() {
        let mut app = app("export_import");
        app.world_mut()
            .resource_mut::<Clipboard>()
            .set_active(pillar());

        app.world_mut().send_event(ExportBlueprint {
            source: ExportSource::Clipboard,
            name: "pillar".into(),
        });
        app.update();
        let exported = drain::<BlueprintExported>(&mut app);
        assert_eq!(exported.len(), 1);
        assert!(exported[0].path.is_file());

        app.world_mut().resource_mut::<Clipboard>().clear();
        app.world_mut().send_event(ImportBlueprint {
            name: "pillar".into(),
            make_active: true,
        });
        app.update();

        let imported = drain::<BlueprintImported>(&mut app);
        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].cells, 2);
        assert_eq!(
            app.world().resource::<BlueprintLibrary>().load("pillar").map(|b| b.cell_count()),
            Some(2)
        );
        assert!(app.world().resource::<Clipboard>().has_active());

        let root = app.world().resource::<BlueprintStore>().root().to_path_buf();
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_export_without_source_fails() {
        let mut app = app("export_missing");
        app.world_mut().send_event(ExportBlueprint {
            source: ExportSource::Library("ghost".into()),
            name: "ghost".into(),
        });
        app.update();
        let failed = drain::<StoreFailed>(&mut app);
        assert_eq!(failed.len(), 1);
        assert!(failed[0].reason.contains("ghost"));
        assert!(drain::<BlueprintExported>(&mut app).is_empty());
    }

    #[test]
    fn test_import_missing_file_fails() {
        let mut app = app("import_missing");
        app.world_mut().send_event(ImportBlueprint {
            name: "nope".into(),
            make_active: false,
        });
        app.update();
        assert_eq!(drain::<StoreFailed>(&mut app).len(), 1);
        assert!(app.world().resource::<BlueprintLibrary>().is_empty());
    }
}
