//! Domain models shared by the admin store and its consumers

pub mod cart;
pub mod notification;
pub mod novel;
pub mod order;
pub mod pricing;
pub mod snapshot;
pub mod sync;
pub mod zone;

pub use cart::{CartItem, CartItemKind, NovelSelection, PaymentType};
pub use notification::{Notification, NotificationDraft, NotificationLevel, Section};
pub use novel::{Novel, NovelCreate, NovelStatus, NovelUpdate};
pub use order::{CustomerInfo, OrderData, OrderLine, OrderTotals, OrderZone};
pub use pricing::{ItemPrice, PriceConfig};
pub use snapshot::ConfigSnapshot;
pub use sync::{EnvelopeKey, Heartbeat, SyncBody, SyncEnvelope, SyncStatus};
pub use zone::{DeliveryZone, DeliveryZoneCreate, DeliveryZoneUpdate, PLACEHOLDER_ZONE_ID};
