use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use layermc_benchmark::GenerationMetrics;
use layermc_registry::{BlockLayerResolver, BlockRegistry, Identifier, PlantMappingResolver};
use layermc_storage::{BlockPos, PlantRestorationStore};
use serde::Serialize;

use crate::config::GenerationConfig;
use crate::region::Region;
use crate::{edge, gradient, TerrainView, World};

/// What a single column needs. Positions are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnAction {
    /// Put `material` with `layers` layers in the cell above the ground.
    PlaceLayer { pos: BlockPos, material: Identifier, layers: u32 },
    /// The plant at `pos` is replaced by the layer; `decorative` goes on top of it.
    SwapPlant { pos: BlockPos, original: Identifier, decorative: Identifier, tall: bool },
    /// Put the original plant back at `pos` (both halves when tall).
    RestorePlant { pos: BlockPos, plant: Identifier, tall: bool },
    Unchanged { x: i32, z: i32 },
}

impl ColumnAction {
    /// Block writes as `(pos, block, layer count)`.
    pub fn writes(&self) -> Vec<(BlockPos, Identifier, Option<u32>)> {
        match self {
            Self::PlaceLayer { pos, material, layers } => vec![(*pos, material.clone(), Some(*layers))],
            Self::SwapPlant { pos, decorative, .. } => vec![(pos.up(1), decorative.clone(), None)],
            Self::RestorePlant { pos, plant, tall } => {
                let upper = if *tall { plant.clone() } else { Identifier::air() };
                vec![(*pos, plant.clone(), None), (pos.up(1), upper, None)]
            }
            Self::Unchanged { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub columns_scanned: usize,
    pub edge_columns: usize,
    pub layers_placed: usize,
    pub plants_swapped: usize,
    pub plants_restored: usize,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} columns scanned, {} edges, {} layers placed, {} plants swapped, {} plants restored",
            self.columns_scanned, self.edge_columns, self.layers_placed, self.plants_swapped, self.plants_restored
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationPlan {
    pub actions: Vec<ColumnAction>,
    pub report: GenerationReport,
}

/// Places layer blocks that fade out with distance from terrain steps, and
/// swaps plants standing in the way for decorative ones.
///
/// Column geometry, with `y` the surface height:
/// - `y`: ground block, picks the layer material
/// - `y + 1`: layer cell; a plant here is swapped out and recorded at this position
/// - `y + 2`: decorative plant on top of the layer. Must be air or the plant's own
///   upper half, which it replaces.
///
/// Columns too close to the top of the `i32` range are left alone.
pub struct EdgeGradientEngine {
    layers: BlockLayerResolver,
    plants: PlantMappingResolver,
    registry: Arc<dyn BlockRegistry>,
    benchmark: Option<Arc<GenerationMetrics>>,
}

impl EdgeGradientEngine {
    pub fn new(layers: BlockLayerResolver, plants: PlantMappingResolver, registry: Arc<dyn BlockRegistry>) -> Self {
        Self {
            layers,
            plants,
            registry,
            benchmark: None,
        }
    }

    pub fn with_benchmark(mut self, benchmark: Option<Arc<GenerationMetrics>>) -> Self {
        self.benchmark = benchmark;
        self
    }

    pub fn layers(&self) -> &BlockLayerResolver {
        &self.layers
    }

    pub fn plants(&self) -> &PlantMappingResolver {
        &self.plants
    }

    /// Plan and apply a run. Store changes are not saved; call
    /// `store.save()` afterwards.
    pub fn generate<W: World + ?Sized>(
        &self,
        world: &mut W,
        store: &mut PlantRestorationStore,
        region: Region,
        config: GenerationConfig,
    ) -> GenerationReport {
        let plan = self.plan(world, store, region, config);

        let start_apply = Instant::now();
        let mut writes = 0;
        for action in &plan.actions {
            for (pos, block, layers) in action.writes() {
                match layers {
                    Some(layers) => world.set_layers(pos, &block, layers),
                    None => world.set_block(pos, &block),
                }
                writes += 1;
            }
        }
        if let Some(bench) = &self.benchmark {
            bench.record_apply(start_apply.elapsed(), writes);
        }

        log::info!("Layer generation finished: {}", plan.report);
        plan.report
    }

    /// Work out every column's action without touching the world. Swaps and
    /// restores are recorded in `store` as they are planned.
    pub fn plan<V: TerrainView + ?Sized>(
        &self,
        view: &V,
        store: &mut PlantRestorationStore,
        region: Region,
        config: GenerationConfig,
    ) -> GenerationPlan {
        let config = config.sanitized();
        let mut plan = GenerationPlan::default();
        if region.is_empty() {
            return plan;
        }
        let start_run = Instant::now();
        let width = region.width as usize;

        // 1. Surface heights, region only
        let start = Instant::now();
        let heights: Vec<i32> = region.columns().map(|(x, z)| view.surface_height(x, z)).collect();
        if let Some(bench) = &self.benchmark {
            bench.record_height_scan(start.elapsed());
        }

        // 2. Edges
        let start = Instant::now();
        let edges = edge::detect_edges(&heights, width, config.edge_height_threshold);
        if let Some(bench) = &self.benchmark {
            bench.record_edge_detection(start.elapsed());
        }

        // 3. Distance to the nearest edge
        let start = Instant::now();
        let cap = gradient::distance_cap(config.mode, config.max_layer_distance);
        let distances = edge::distance_field(&edges, width, cap);
        if let Some(bench) = &self.benchmark {
            bench.record_distance(start.elapsed());
        }

        // 4. Per-column actions
        let start = Instant::now();
        plan.report.columns_scanned = heights.len();
        plan.report.edge_columns = edges.iter().filter(|e| **e).count();

        for (i, (x, z)) in region.columns().enumerate() {
            let layers = distances[i]
                .map(|d| gradient::layers_for_distance(config.mode, config.max_layer_distance, d))
                .unwrap_or(0);
            let ground = BlockPos::new(x, heights[i], z);

            let before = plan.actions.len();
            if ground.checked_up(2).is_none() {
                log::debug!("Column {},{} reaches the top of the world, skipping", x, z);
            } else if layers > 0 {
                self.plan_layer(view, store, ground, layers, &mut plan);
            } else {
                self.plan_restore(view, store, ground, &mut plan);
            }
            if plan.actions.len() == before {
                plan.actions.push(ColumnAction::Unchanged { x, z });
            }
        }

        if let Some(bench) = &self.benchmark {
            bench.record_emit(start.elapsed());
            bench.record_run(start_run.elapsed(), heights.len());
        }
        plan
    }

    fn plan_layer<V: TerrainView + ?Sized>(
        &self,
        view: &V,
        store: &mut PlantRestorationStore,
        ground: BlockPos,
        layers: u32,
        plan: &mut GenerationPlan,
    ) {
        let cell = ground.up(1);
        let occupant = view.block_at(cell);

        if self.plants.is_replaceable(&occupant) {
            let Some(decorative) = self.plants.to_decorative(&occupant) else {
                // Nowhere to put the plant; leave the column alone rather than lose it
                log::debug!("No usable decorative plant for {} at {}, skipping column", occupant, cell);
                return;
            };
            let above = view.block_at(cell.up(1));
            let tall = above == occupant;
            if !tall && above != Identifier::air() {
                log::debug!("Cell above plant at {} is occupied by {}, skipping column", cell, above);
                return;
            }

            store.store_plant(cell, &occupant);
            if tall {
                store.store_tall_plant(cell, true);
            } else {
                // A flag left by an earlier tall plant here must not carry over
                store.remove_tall_plant_flag(cell);
            }
            plan.actions.push(ColumnAction::SwapPlant {
                pos: cell,
                original: occupant,
                decorative,
                tall,
            });
            plan.report.plants_swapped += 1;
        } else if occupant != Identifier::air() && !self.layers.is_layer_block(&occupant) {
            log::debug!("Layer cell {} is occupied by {}, skipping column", cell, occupant);
            return;
        }

        let material = self.layers.resolve(&view.block_at(ground));
        plan.actions.push(ColumnAction::PlaceLayer { pos: cell, material, layers });
        plan.report.layers_placed += 1;
    }

    fn plan_restore<V: TerrainView + ?Sized>(
        &self,
        view: &V,
        store: &mut PlantRestorationStore,
        ground: BlockPos,
        plan: &mut GenerationPlan,
    ) {
        let cell = ground.up(1);
        if !store.has_plant_data(cell) {
            return;
        }
        let above = view.block_at(cell.up(1));
        if !self.plants.is_decorative_plant(&above) {
            return;
        }

        // Prefer the recorded plant; fall back to the reverse mapping if the
        // record is unusable
        let recorded = store.get_plant(cell).filter(|id| {
            let known = self.registry.is_registered(id);
            if !known {
                log::warn!("Recorded plant {} at {} is no longer registered", id, cell);
            }
            known
        });
        let Some(plant) = recorded.or_else(|| self.plants.to_vanilla(&above).cloned()) else {
            log::warn!("Cannot restore plant at {}: no usable record for {}", cell, above);
            return;
        };
        let tall = store.is_tall_plant(cell);

        store.remove_plant(cell);
        store.remove_tall_plant_flag(cell);
        plan.actions.push(ColumnAction::RestorePlant { pos: cell, plant, tall });
        plan.report.plants_restored += 1;
    }
}
