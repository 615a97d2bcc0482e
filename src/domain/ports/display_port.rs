//! Display sink port definition.

use crate::domain::entities::RenderFrame;

/// Port for the sink rendered frames are presented to.
///
/// One call per render: a handle rendered three times presents three
/// frames, whatever the load state. What the sink does with a frame is an
/// implementation detail.
pub trait DisplayPort: Send + Sync {
    /// Presents one frame to the user.
    fn present(&self, frame: &RenderFrame);
}
