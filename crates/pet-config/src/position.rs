use live2d_pet_protocol::Bounds;
use live2d_pet_protocol::constants::DEFAULT_POSITION_MARGIN;

/// Bottom-right position for a `width` x `height` window inside `work_area`,
/// keeping a fixed margin from the right and bottom edges.
///
/// The work area comes from the window host; out-of-range values saturate at
/// the `i32` bounds.
pub fn default_position(work_area: Bounds, width: i32, height: i32) -> (i32, i32) {
    let x = far_edge(work_area.x, work_area.width, width);
    let y = far_edge(work_area.y, work_area.height, height);
    (x, y)
}

fn far_edge(origin: i32, extent: i32, size: i32) -> i32 {
    origin
        .saturating_add(extent)
        .saturating_sub(size)
        .saturating_sub(DEFAULT_POSITION_MARGIN)
}
