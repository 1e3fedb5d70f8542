use serde::{Deserialize, Serialize};

use crate::config::check;
use crate::error::ConfigError;
use crate::report::Totals;

/// Nominal 1:2:4 (cement:sand:aggregate) concrete mix.
const MIX: [f64; 3] = [1.0, 2.0, 4.0];
/// Wet-to-dry volume factor for concrete ingredients.
const DRY_VOLUME_FACTOR: f64 = 1.54;
/// Bulk density of cement, kg/m³.
const CEMENT_DENSITY: f64 = 1440.0;

/// Rule-of-thumb inputs for the bill of quantities.
///
/// Lengths in metres unless the field name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoqAssumptions {
    pub cement_bag_kg: f64,
    pub plaster_thickness_mm: f64,
    /// Side of a square floor tile.
    pub tile_size_mm: f64,
    pub excavation_depth: f64,
    pub excavation_width: f64,
    pub footing_width: f64,
    pub footing_depth: f64,
    pub slab_thickness: f64,
    pub pcc_thickness: f64,
    pub wall_height: f64,
    pub bricks_per_m3: f64,
    /// One coat, m² per litre.
    pub paint_coverage: f64,
    /// Reinforcement per m³ of concrete, kg.
    pub steel_per_m3: f64,
    pub contingency_percent: f64,
}

impl Default for BoqAssumptions {
    fn default() -> Self {
        Self {
            cement_bag_kg: 50.0,
            plaster_thickness_mm: 12.0,
            tile_size_mm: 600.0,
            excavation_depth: 1.0,
            excavation_width: 1.0,
            footing_width: 0.6,
            footing_depth: 0.5,
            slab_thickness: 0.15,
            pcc_thickness: 0.10,
            wall_height: 3.0,
            bricks_per_m3: 500.0,
            paint_coverage: 10.0,
            steel_per_m3: 80.0,
            contingency_percent: 10.0,
        }
    }
}

impl BoqAssumptions {
    /// # Errors
    ///
    /// Returns `ConfigError::OutOfRange` naming the first field that is not
    /// a finite positive number (contingency may be zero).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v > 0.0;
        check("boq.cement_bag_kg", "finite and > 0", self.cement_bag_kg, positive)?;
        check(
            "boq.plaster_thickness_mm",
            "finite and > 0",
            self.plaster_thickness_mm,
            positive,
        )?;
        check("boq.tile_size_mm", "finite and > 0", self.tile_size_mm, positive)?;
        check("boq.excavation_depth", "finite and > 0", self.excavation_depth, positive)?;
        check("boq.excavation_width", "finite and > 0", self.excavation_width, positive)?;
        check("boq.footing_width", "finite and > 0", self.footing_width, positive)?;
        check("boq.footing_depth", "finite and > 0", self.footing_depth, positive)?;
        check("boq.slab_thickness", "finite and > 0", self.slab_thickness, positive)?;
        check("boq.pcc_thickness", "finite and > 0", self.pcc_thickness, positive)?;
        check("boq.wall_height", "finite and > 0", self.wall_height, positive)?;
        check("boq.bricks_per_m3", "finite and > 0", self.bricks_per_m3, positive)?;
        check("boq.paint_coverage", "finite and > 0", self.paint_coverage, positive)?;
        check("boq.steel_per_m3", "finite and >= 0", self.steel_per_m3, |v| v >= 0.0)?;
        check(
            "boq.contingency_percent",
            "finite and >= 0",
            self.contingency_percent,
            |v| v >= 0.0,
        )
    }
}

/// One line of the bill of quantities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItem {
    pub item: &'static str,
    pub quantity: f64,
    pub unit: String,
}

impl WorkItem {
    fn new(item: &'static str, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            item,
            quantity,
            unit: unit.into(),
        }
    }
}

/// Ingredients for a volume of concrete.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConcreteBreakdown {
    pub concrete_volume: f64,
    pub cement_kg: f64,
    pub cement_bags: f64,
    pub sand_volume: f64,
    pub aggregate_volume: f64,
}

impl ConcreteBreakdown {
    #[must_use]
    pub fn for_volume(volume: f64, cement_bag_kg: f64) -> Self {
        let dry = volume * DRY_VOLUME_FACTOR;
        let parts: f64 = MIX.iter().sum();
        let cement_kg = dry * MIX[0] / parts * CEMENT_DENSITY;
        Self {
            concrete_volume: volume,
            cement_kg,
            cement_bags: cement_kg / cement_bag_kg,
            sand_volume: dry * MIX[1] / parts,
            aggregate_volume: dry * MIX[2] / parts,
        }
    }
}

/// Approximate material quantities for a whole plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialEstimate {
    /// Centerline wall run: long plus short wall lengths.
    pub wall_run: f64,
    pub work_items: Vec<WorkItem>,
    pub concrete: ConcreteBreakdown,
    pub plaster_volume: f64,
    pub tiles: f64,
    pub bricks: f64,
    pub paint_liters: f64,
    pub contingency_note: String,
}

/// Estimates the twelve work items from excavation to painting.
///
/// Pure arithmetic over plan totals. Wall-run quantities (excavation,
/// footing, masonry, plaster, paint) follow the long-wall/short-wall
/// method; slab and PCC follow the built-up area; tiles follow the carpet
/// area.
#[must_use]
pub fn estimate(totals: &Totals, wall_thickness: f64, a: &BoqAssumptions) -> MaterialEstimate {
    let wall_run = totals.long_wall_length + totals.short_wall_length;

    let excavation = wall_run * a.excavation_width * a.excavation_depth;
    let footing = wall_run * a.footing_width * a.footing_depth;
    let slab = totals.built_up_area * a.slab_thickness;
    let pcc = totals.built_up_area * a.pcc_thickness;

    let wall_volume = wall_run * wall_thickness * a.wall_height;
    let bricks = wall_volume * a.bricks_per_m3;
    let wall_area = wall_run * a.wall_height;
    let plaster_volume = wall_area * a.plaster_thickness_mm / 1000.0;

    let tile_side = a.tile_size_mm / 1000.0;
    let tiles = (totals.carpet_area / (tile_side * tile_side)).ceil();

    let concrete = ConcreteBreakdown::for_volume(slab + footing + pcc, a.cement_bag_kg);
    let steel = concrete.concrete_volume * a.steel_per_m3;
    let paint_liters = wall_area / a.paint_coverage;

    let work_items = vec![
        WorkItem::new("Excavation", excavation, "m3"),
        WorkItem::new("PCC (under slab)", pcc, "m3"),
        WorkItem::new("Footing concrete", footing, "m3"),
        WorkItem::new("RCC slab/beams", slab, "m3"),
        WorkItem::new("Reinforcement steel", steel, "kg"),
        WorkItem::new("Masonry (bricks)", bricks, "nos"),
        WorkItem::new("Sand (for concrete/mortar)", concrete.sand_volume, "m3"),
        WorkItem::new("Coarse aggregate", concrete.aggregate_volume, "m3"),
        WorkItem::new(
            "Cement",
            concrete.cement_bags,
            format!("bags ({}kg)", a.cement_bag_kg),
        ),
        WorkItem::new("Plaster (both sides)", plaster_volume, "m3"),
        WorkItem::new("Tiles / Flooring", tiles, "nos"),
        WorkItem::new("Paint (liters)", paint_liters, "liters"),
    ];

    MaterialEstimate {
        wall_run,
        work_items,
        concrete,
        plaster_volume,
        tiles,
        bricks,
        paint_liters,
        contingency_note: format!(
            "Add ~{}% contingency for waste and variations.",
            a.contingency_percent
        ),
    }
}
