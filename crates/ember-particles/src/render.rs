//! Renderer handoff contract

use crate::pool::ActiveParticles;

/// The external drawing surface.
///
/// On `attach` it stores the shared live-particle handle for the session and,
/// on each of its own paint passes, iterates the list read-only under its
/// lock, drawing every particle's sprite at its current position, rotation,
/// scale, alpha and frame. The list may grow or shrink between paints. The
/// surface owns no simulation state.
pub trait DrawSurface: Send {
    /// Hands over the shared live-particle container for a starting session.
    fn attach(&mut self, particles: ActiveParticles);

    /// The session is over; drop the stored handle.
    fn detach(&mut self);

    /// A tick finished; schedule a repaint when convenient.
    fn request_repaint(&mut self);
}
