// elx-common/src/model/mod.rs
pub mod descriptor;
pub mod executable;
pub mod version;

pub use descriptor::DownloadDescriptor;
pub use executable::{is_install_root, ResolvedExecutable};
pub use version::versions_equal;
