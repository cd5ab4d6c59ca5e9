use crate::config::GenerationMode;

/// Distance at which a mode stops placing layers.
pub fn distance_cap(mode: GenerationMode, max_layer_distance: u32) -> u32 {
    match mode {
        GenerationMode::Basic => max_layer_distance,
        GenerationMode::Smooth => max_layer_distance.saturating_mul(2),
    }
}

/// Layer count for a column `distance` columns away from the nearest edge.
pub fn layers_for_distance(mode: GenerationMode, max_layer_distance: u32, distance: u32) -> u32 {
    if distance >= distance_cap(mode, max_layer_distance) {
        return 0;
    }
    match mode {
        GenerationMode::Basic => max_layer_distance - distance,
        GenerationMode::Smooth => max_layer_distance - distance / 2,
    }
}
