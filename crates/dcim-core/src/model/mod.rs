// ── Domain model ──
//
// Named node types for both export shapes. Trees are built once per
// export by `crate::tree` and discarded after emission.

pub mod device;
pub mod entity_id;
pub mod interface;
pub mod site;

pub use device::{DeviceNode, DeviceTypeRef, RackRef, TenantRef};
pub use entity_id::EntityId;
pub use interface::Interface;
pub use site::{LocationNode, RackDeviceNode, RackNode, SiteNode};
