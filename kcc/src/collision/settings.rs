/*!
Collision tolerances and iteration limits.

These constants centralize the numeric parameters of the ray casts, the
ground probe and the sweep. They are fixed rather than configurable: changing
them changes the meaning of every contact the controller reports.

Notes
- Distances are in meters.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-6;

/// Minimum squared displacement worth sweeping (m^2).
/// Movements below this are treated as zero to avoid tiny oscillations.
pub const MIN_MOVE_SQ: f32 = 1.0e-10;

/// Horizontal inset of the corner ground probes from the actor's footprint edge.
pub const PROBE_CORNER_INSET: f32 = 0.01;

/// Height above the feet at which ground probes start, so a slightly sunken
/// actor still finds the surface under it.
pub const PROBE_LIFT: f32 = 0.1;

/// Speed away from the last ground plane (m/s) above which an actor is
/// leaving the surface and the ground probe stays off.
pub const SEPARATING_SPEED_EPS: f32 = 1.0e-3;
