//! Rebuild control for an interactive isosurface.
//!
//! [`IsoSurface`] owns the field, the sampled lattice, the classification and
//! the current mesh. Each parameter change runs the affected pipeline stages to
//! completion before returning:
//!
//! | change    | stages                                          |
//! |-----------|-------------------------------------------------|
//! | threshold | Classifying, Triangulating                      |
//! | geometry  | Resampling, Classifying, Triangulating          |
//! | field     | Resampling, Classifying, Triangulating          |
//! | meshing   | Triangulating                                   |
//!
//! Every stage builds into fresh storage and the result is committed only once
//! all stages have finished, so a rejected request leaves the previous mesh in
//! place.

use core::fmt;

use iso_core::ScalarField;

use crate::classify::Classification;
use crate::config::{GeometryConfig, MeshingConfig, NormalMode};
use crate::error::{IsoError, Result};
use crate::lattice::{Lattice, ValueRange};
use crate::mesh::{MeshBuffers, SurfaceMesh};
use crate::normals::{area_weighted_normals, gradient_normals, GRADIENT_STEP_FACTOR};
use crate::triangulate::triangulate;

/// A scalar field owned by the controller.
pub type BoxedField = Box<dyn ScalarField + Send + Sync>;

/// Pipeline stage the controller is in.
///
/// Outside a rebuild call the controller is always `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuildState {
    /// No rebuild in progress.
    Idle,
    /// Evaluating the field at every lattice vertex.
    Resampling,
    /// Computing per-cell classification codes.
    Classifying,
    /// Emitting triangles and estimating normals.
    Triangulating,
}

/// What started a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebuildTrigger {
    /// First build when the controller was created.
    Initial,
    /// The threshold changed.
    Threshold,
    /// Origin, cell size or resolution changed.
    Geometry,
    /// The scalar field was replaced.
    Field,
    /// Indexing strategy or normal mode changed.
    Meshing,
}

/// Summary of one completed rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct RebuildReport {
    /// What started the rebuild.
    pub trigger: RebuildTrigger,
    /// Stages visited, in order, ending back at `Idle`.
    pub states: Vec<RebuildState>,
    /// Triangles in the committed mesh.
    pub triangle_count: usize,
    /// Positions in the committed mesh.
    pub vertex_count: usize,
    /// Lattice samples that were not finite.
    pub non_finite_samples: usize,
}

/// A request from the user interface.
pub enum ParameterEvent {
    /// Move the threshold.
    SetThreshold(f32),
    /// Replace the lattice geometry.
    SetGeometry(GeometryConfig),
    /// Replace the scalar field.
    SetField(BoxedField),
    /// Show or hide the lattice wireframe.
    SetVisible(bool),
}

impl fmt::Debug for ParameterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterEvent::SetThreshold(iso) => f.debug_tuple("SetThreshold").field(iso).finish(),
            ParameterEvent::SetGeometry(g) => f.debug_tuple("SetGeometry").field(g).finish(),
            ParameterEvent::SetField(_) => f.write_str("SetField(..)"),
            ParameterEvent::SetVisible(v) => f.debug_tuple("SetVisible").field(v).finish(),
        }
    }
}

/// Borrowed lattice wireframe for drawing as a line list.
#[derive(Debug, Clone, Copy)]
pub struct Wireframe<'a> {
    /// Lattice vertex positions.
    pub positions: &'a [iso_core::Point3],
    /// Two indices per lattice edge.
    pub indices: &'a [u32],
}

/// Controller owning an isosurface and everything derived from it.
///
/// # Example
///
/// ```ignore
/// use iso_rs::{fields, GeometryConfig, IsoSurfaceBuilder, Point3};
///
/// let mut surface = IsoSurfaceBuilder::new()
///     .field(fields::radial_squared(Point3::ZERO))
///     .geometry(GeometryConfig::centered(0.5, 8, 8, 8))
///     .threshold(1.0)
///     .build()?;
///
/// surface.on_threshold_changed(1.5)?;
/// let buffers = surface.take_buffers();
/// ```
pub struct IsoSurface {
    field: BoxedField,
    threshold: f32,
    meshing: MeshingConfig,
    lattice: Lattice,
    wireframe: Vec<u32>,
    classification: Classification,
    mesh: SurfaceMesh,
    state: RebuildState,
    wireframe_visible: bool,
    generation: u64,
}

/// Collects the stages of one rebuild.
struct Pass {
    trigger: RebuildTrigger,
    states: Vec<RebuildState>,
}

impl Pass {
    fn new(trigger: RebuildTrigger) -> Self {
        Self {
            trigger,
            states: Vec::with_capacity(5),
        }
    }

    fn enter(&mut self, state: &mut RebuildState, next: RebuildState) {
        log::debug!("{:?} rebuild: {:?} -> {:?}", self.trigger, state, next);
        *state = next;
        self.states.push(next);
    }
}

impl IsoSurface {
    /// Create a controller and run the initial full rebuild.
    ///
    /// # Errors
    /// `InvalidGeometry` for bad lattice parameters, `InvalidThreshold` for a
    /// non-finite threshold.
    pub fn new(
        field: BoxedField,
        geometry: GeometryConfig,
        threshold: f32,
        meshing: MeshingConfig,
    ) -> Result<Self> {
        check_threshold(threshold)?;

        let mut state = RebuildState::Idle;
        let mut pass = Pass::new(RebuildTrigger::Initial);

        pass.enter(&mut state, RebuildState::Resampling);
        let lattice = Lattice::sample(geometry, field.as_ref())?;

        pass.enter(&mut state, RebuildState::Classifying);
        let classification = Classification::classify(&lattice, threshold);

        pass.enter(&mut state, RebuildState::Triangulating);
        let mesh = build_mesh(&lattice, &classification, meshing, field.as_ref());

        let mut surface = Self {
            field,
            threshold,
            meshing,
            wireframe: lattice.wireframe_indices(),
            lattice,
            classification,
            mesh,
            state,
            wireframe_visible: false,
            generation: 0,
        };
        surface.finish(pass);
        Ok(surface)
    }

    /// Re-threshold the cached samples.
    ///
    /// # Errors
    /// `InvalidThreshold` if `threshold` is NaN or infinite.
    pub fn on_threshold_changed(&mut self, threshold: f32) -> Result<RebuildReport> {
        check_threshold(threshold).map_err(|err| self.reject(err))?;

        let mut pass = Pass::new(RebuildTrigger::Threshold);

        pass.enter(&mut self.state, RebuildState::Classifying);
        let classification = Classification::classify(&self.lattice, threshold);

        pass.enter(&mut self.state, RebuildState::Triangulating);
        let mesh = build_mesh(
            &self.lattice,
            &classification,
            self.meshing,
            self.field.as_ref(),
        );

        self.threshold = threshold;
        self.classification = classification;
        self.mesh = mesh;
        Ok(self.finish(pass))
    }

    /// Resample on a new lattice and rebuild everything.
    ///
    /// # Errors
    /// `InvalidGeometry` if `geometry` fails validation. The check runs before
    /// any allocation and the previous lattice and mesh are kept.
    pub fn on_geometry_changed(&mut self, geometry: GeometryConfig) -> Result<RebuildReport> {
        geometry.validate().map_err(|err| self.reject(err))?;

        let mut pass = Pass::new(RebuildTrigger::Geometry);

        pass.enter(&mut self.state, RebuildState::Resampling);
        let lattice =
            Lattice::sample(geometry, self.field.as_ref()).map_err(|err| self.reject(err))?;

        self.rebuild_from(pass, lattice, None)
    }

    /// Replace the field and rebuild everything on the current lattice.
    pub fn on_field_changed(&mut self, field: BoxedField) -> Result<RebuildReport> {
        let mut pass = Pass::new(RebuildTrigger::Field);

        pass.enter(&mut self.state, RebuildState::Resampling);
        let geometry = *self.lattice.geometry();
        let lattice = Lattice::sample(geometry, field.as_ref()).map_err(|err| self.reject(err))?;

        self.rebuild_from(pass, lattice, Some(field))
    }

    /// Change the indexing strategy or normal mode and re-triangulate.
    pub fn on_meshing_changed(&mut self, meshing: MeshingConfig) -> RebuildReport {
        let mut pass = Pass::new(RebuildTrigger::Meshing);

        pass.enter(&mut self.state, RebuildState::Triangulating);
        self.mesh = build_mesh(
            &self.lattice,
            &self.classification,
            meshing,
            self.field.as_ref(),
        );
        self.meshing = meshing;
        self.finish(pass)
    }

    /// Dispatch a user-interface event to the matching transition.
    ///
    /// Returns `None` for events that do not rebuild anything.
    pub fn handle(&mut self, event: ParameterEvent) -> Result<Option<RebuildReport>> {
        log::trace!("handling {:?}", event);
        match event {
            ParameterEvent::SetThreshold(threshold) => {
                self.on_threshold_changed(threshold).map(Some)
            }
            ParameterEvent::SetGeometry(geometry) => self.on_geometry_changed(geometry).map(Some),
            ParameterEvent::SetField(field) => self.on_field_changed(field).map(Some),
            ParameterEvent::SetVisible(visible) => {
                self.set_wireframe_visible(visible);
                Ok(None)
            }
        }
    }

    /// Current threshold.
    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Geometry of the current lattice.
    #[inline]
    pub fn geometry(&self) -> &GeometryConfig {
        self.lattice.geometry()
    }

    /// Current meshing options.
    #[inline]
    pub fn meshing(&self) -> MeshingConfig {
        self.meshing
    }

    /// The scalar field being contoured.
    #[inline]
    pub fn field(&self) -> &(dyn ScalarField + Send + Sync) {
        self.field.as_ref()
    }

    /// Range of the finite values seen by the latest resampling.
    #[inline]
    pub fn value_range(&self) -> ValueRange {
        self.lattice.value_range()
    }

    /// The sampled lattice.
    #[inline]
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Classification of the current lattice at the current threshold.
    #[inline]
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// The current mesh.
    #[inline]
    pub fn mesh(&self) -> &SurfaceMesh {
        &self.mesh
    }

    /// Move the current mesh out as render buffers.
    ///
    /// The controller keeps an empty mesh until the next rebuild.
    pub fn take_buffers(&mut self) -> MeshBuffers {
        core::mem::take(&mut self.mesh).into_buffers()
    }

    /// Pipeline stage; always `Idle` between calls.
    #[inline]
    pub fn state(&self) -> RebuildState {
        self.state
    }

    /// Number of rebuilds committed since creation, the initial one excluded.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Show or hide the lattice wireframe.
    pub fn set_wireframe_visible(&mut self, visible: bool) {
        if visible != self.wireframe_visible {
            log::debug!("wireframe {}", if visible { "shown" } else { "hidden" });
        }
        self.wireframe_visible = visible;
    }

    /// Whether the lattice wireframe is shown.
    #[inline]
    pub fn wireframe_visible(&self) -> bool {
        self.wireframe_visible
    }

    /// The lattice wireframe, or `None` while hidden.
    pub fn wireframe(&self) -> Option<Wireframe<'_>> {
        self.wireframe_visible.then(|| Wireframe {
            positions: self.lattice.positions(),
            indices: &self.wireframe,
        })
    }

    /// Classify and triangulate a freshly sampled lattice, then commit it.
    fn rebuild_from(
        &mut self,
        mut pass: Pass,
        lattice: Lattice,
        field: Option<BoxedField>,
    ) -> Result<RebuildReport> {
        pass.enter(&mut self.state, RebuildState::Classifying);
        let classification = Classification::classify(&lattice, self.threshold);

        pass.enter(&mut self.state, RebuildState::Triangulating);
        let mesh = {
            let field = field.as_deref().unwrap_or(self.field.as_ref());
            build_mesh(&lattice, &classification, self.meshing, field)
        };

        if let Some(field) = field {
            self.field = field;
        }
        // The wireframe depends on the lattice shape only
        if pass.trigger == RebuildTrigger::Geometry {
            self.wireframe = lattice.wireframe_indices();
        }
        self.lattice = lattice;
        self.classification = classification;
        self.mesh = mesh;
        Ok(self.finish(pass))
    }

    fn finish(&mut self, mut pass: Pass) -> RebuildReport {
        pass.enter(&mut self.state, RebuildState::Idle);
        if pass.trigger != RebuildTrigger::Initial {
            self.generation += 1;
        }

        let report = RebuildReport {
            trigger: pass.trigger,
            states: pass.states,
            triangle_count: self.mesh.triangle_count(),
            vertex_count: self.mesh.vertex_count(),
            non_finite_samples: self.lattice.non_finite_count(),
        };
        log::info!(
            "{:?} rebuild at threshold {}: {} triangles, {} vertices",
            report.trigger,
            self.threshold,
            report.triangle_count,
            report.vertex_count
        );
        report
    }

    fn reject(&mut self, err: IsoError) -> IsoError {
        log::warn!("rebuild rejected, keeping previous mesh: {}", err);
        self.state = RebuildState::Idle;
        err
    }
}

impl fmt::Debug for IsoSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsoSurface")
            .field("threshold", &self.threshold)
            .field("geometry", self.lattice.geometry())
            .field("meshing", &self.meshing)
            .field("triangles", &self.mesh.triangle_count())
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

fn check_threshold(threshold: f32) -> Result<()> {
    if threshold.is_finite() {
        Ok(())
    } else {
        Err(IsoError::InvalidThreshold { value: threshold })
    }
}

/// Triangulate and attach normals.
fn build_mesh(
    lattice: &Lattice,
    classification: &Classification,
    meshing: MeshingConfig,
    field: &(dyn ScalarField + Send + Sync),
) -> SurfaceMesh {
    let mut mesh = triangulate(lattice, classification, meshing.strategy);
    mesh.normals = match meshing.normals {
        NormalMode::AreaWeighted => area_weighted_normals(&mesh.positions, &mesh.indices),
        NormalMode::FieldGradient => {
            let step = GRADIENT_STEP_FACTOR * lattice.geometry().cell_size;
            gradient_normals(&mesh.positions, field, step)
        }
    };
    mesh
}
