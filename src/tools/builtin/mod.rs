//! Built-in tools and their groups.

mod agents;
mod discovery;
pub(crate) mod format;
mod glif;
mod metaskill;

use std::sync::Arc;

pub use agents::{ListAgentsTool, LoadAgentTool};
pub use discovery::{ListFeaturedGlifsTool, MyGlifsTool, MyUserInfoTool, SearchGlifsTool};
pub use glif::{GlifInfoTool, RunGlifTool};
pub use metaskill::{
    ListSavedGlifToolsTool, RemoveAllGlifToolsTool, RemoveGlifToolTool, SaveGlifAsToolTool,
};

use crate::tools::registry::ToolGroup;
use crate::tools::runner::GlifRunner;
use crate::tools::store::SavedToolStore;
use crate::tools::tool::Tool;

/// Tools listed and dispatched regardless of flags.
pub fn core_tools(runner: &Arc<GlifRunner>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(RunGlifTool::new(Arc::clone(runner))),
        Arc::new(GlifInfoTool::new(Arc::clone(runner))),
    ]
}

/// Flag-gated groups in listing order.
pub fn optional_groups(runner: &Arc<GlifRunner>, store: &Arc<SavedToolStore>) -> Vec<ToolGroup> {
    let api = runner.api();
    vec![
        ToolGroup::new(
            "discovery",
            |c| c.discovery,
            vec![
                Arc::new(ListFeaturedGlifsTool::new(Arc::clone(api))),
                Arc::new(SearchGlifsTool::new(Arc::clone(api))),
                Arc::new(MyGlifsTool::new(Arc::clone(api))),
                Arc::new(MyUserInfoTool::new(Arc::clone(api))),
            ],
        ),
        ToolGroup::new(
            "metaskill",
            |c| c.metaskill,
            vec![
                Arc::new(SaveGlifAsToolTool::new(Arc::clone(api), Arc::clone(store))),
                Arc::new(RemoveGlifToolTool::new(Arc::clone(store))),
                Arc::new(RemoveAllGlifToolsTool::new(Arc::clone(store))),
                Arc::new(ListSavedGlifToolsTool::new(Arc::clone(store))),
            ],
        ),
        ToolGroup::new(
            "agents",
            |c| c.agents,
            vec![
                Arc::new(ListAgentsTool::new(Arc::clone(api))),
                Arc::new(LoadAgentTool::new(Arc::clone(api))),
            ],
        ),
    ]
}
