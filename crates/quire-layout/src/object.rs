//! The visual object base: geometry, resolution, and the deferred queue.
//!
//! Every layout object owns a raster and a FIFO queue of pending edits.
//! Eager objects create their canvas at construction and apply edits
//! immediately. Deferred objects create their canvas on first finalization,
//! then replay the queue once, in order.

use std::fmt;

use quire_core::{units, Color, ConfigError, DVec2, RenderError};
use quire_render::{CompositeOptions, Raster, RasterEngine};

/// An in-place edit of an object's raster.
pub type MutateFn = Box<dyn FnOnce(&mut Raster) -> Result<(), RenderError>>;

/// A pending operation on an object's raster.
pub enum QueuedOp {
    /// Edit the raster in place
    Mutate(MutateFn),
    /// Composite another raster onto this one
    Composite {
        image: Raster,
        options: CompositeOptions,
    },
}

impl fmt::Debug for QueuedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueuedOp::Mutate(_) => f.write_str("Mutate(..)"),
            QueuedOp::Composite { image, options } => f
                .debug_struct("Composite")
                .field("dimensions", &image.dimensions())
                .field("options", options)
                .finish(),
        }
    }
}

/// Lifecycle of an object's raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectState {
    /// No canvas yet (deferred objects only)
    Uninitialized,
    /// Blank canvas exists, queue not yet replayed
    BaseCreated,
    /// Queue replayed, raster ready for composition
    Finalized,
}

/// Read-only snapshot of the parent an object is rendered into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Parent's effective resolution
    pub resolution: u32,
    /// Parent's size in millimeters
    pub size_mm: DVec2,
}

/// Per-call render configuration.
///
/// Defaults: no resolution or size override, no parent context, no debug
/// borders.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// Resolution to render at instead of the object's own
    pub force_resolution: Option<u32>,
    /// Exact pixel size to render at instead of the object's own size
    pub force_pixel_size: Option<(u32, u32)>,
    /// The parent being rendered into, if any
    pub context: Option<&'a RenderContext>,
    /// Draw a 0.5mm border of this color around every page child
    pub border_color: Option<Color>,
}

impl<'a> RenderOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the resolution.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.force_resolution = Some(resolution);
        self
    }

    /// Override the pixel size.
    pub fn with_pixel_size(mut self, width: u32, height: u32) -> Self {
        self.force_pixel_size = Some((width, height));
        self
    }

    /// Render within a parent context.
    pub fn with_context(mut self, context: &'a RenderContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Draw debug borders of the given color around page children.
    pub fn with_borders(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    /// Draw debug borders in translucent red.
    pub fn with_debug_borders(self) -> Self {
        self.with_borders(Color::DEBUG_BORDER)
    }

    /// Options for a child rendered into `context`.
    ///
    /// Resolution overrides and border settings carry over; the pixel size
    /// is the one the parent resolved for the child.
    pub fn for_child<'b>(
        &self,
        context: &'b RenderContext,
        pixel_size: Option<(u32, u32)>,
    ) -> RenderOptions<'b> {
        RenderOptions {
            force_resolution: self.force_resolution,
            force_pixel_size: pixel_size,
            context: Some(context),
            border_color: self.border_color,
        }
    }

    /// Forced resolution, else the parent's, else `own`.
    pub fn inherited_resolution(&self, own: u32) -> u32 {
        self.force_resolution
            .or(self.context.map(|ctx| ctx.resolution))
            .unwrap_or(own)
    }
}

/// State shared by every visual object.
pub struct ObjectBase {
    /// Position in millimeters relative to the parent's top-left corner
    pub position_mm: DVec2,
    /// Size in millimeters; negative components are parent-relative
    pub size_mm: DVec2,
    /// Resolution in pixels per inch
    pub resolution: u32,
    deferred: bool,
    state: ObjectState,
    image: Option<Raster>,
    queue: Vec<QueuedOp>,
}

impl fmt::Debug for ObjectBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBase")
            .field("position_mm", &self.position_mm)
            .field("size_mm", &self.size_mm)
            .field("resolution", &self.resolution)
            .field("deferred", &self.deferred)
            .field("state", &self.state)
            .field("image", &self.image.as_ref().map(Raster::dimensions))
            .field("queue", &self.queue)
            .finish()
    }
}

impl ObjectBase {
    /// Create an object whose canvas exists immediately.
    ///
    /// Eager objects need a concrete, positive size.
    pub fn eager(position_mm: DVec2, size_mm: DVec2, resolution: u32) -> Result<Self, ConfigError> {
        if resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !(size_mm.x > 0.0 && size_mm.y > 0.0) {
            return Err(ConfigError::InvalidEagerSize {
                width: size_mm.x,
                height: size_mm.y,
            });
        }

        let (width, height) = units::size_to_px(size_mm, resolution);
        Ok(Self {
            position_mm,
            size_mm,
            resolution,
            deferred: false,
            state: ObjectState::BaseCreated,
            image: Some(Raster::new(width, height)),
            queue: Vec::new(),
        })
    }

    /// Create an object whose canvas is created on first finalization.
    pub fn deferred(
        position_mm: DVec2,
        size_mm: DVec2,
        resolution: u32,
    ) -> Result<Self, ConfigError> {
        if resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }

        Ok(Self {
            position_mm,
            size_mm,
            resolution,
            deferred: true,
            state: ObjectState::Uninitialized,
            image: None,
            queue: Vec::new(),
        })
    }

    /// A deferred object whose size is only known once rendered.
    pub(crate) fn self_sized(position_mm: DVec2, resolution: u32) -> Self {
        Self {
            position_mm,
            size_mm: DVec2::ZERO,
            resolution: resolution.max(1),
            deferred: true,
            state: ObjectState::Uninitialized,
            image: None,
            queue: Vec::new(),
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.deferred
    }

    pub fn state(&self) -> ObjectState {
        self.state
    }

    /// The object's raster, once it exists.
    pub fn image(&self) -> Option<&Raster> {
        self.image.as_ref()
    }

    /// Mutable access to the object's raster, once it exists.
    pub fn image_mut(&mut self) -> Option<&mut Raster> {
        self.image.as_mut()
    }

    /// Number of operations waiting for replay.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Queue an in-place edit, or apply it now if the raster is live.
    pub fn queue_mutate<F>(&mut self, op: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Raster) -> Result<(), RenderError> + 'static,
    {
        self.enqueue(QueuedOp::Mutate(Box::new(op)))
    }

    /// Queue a composite, or apply it now if the raster is live.
    pub fn queue_composite(
        &mut self,
        image: Raster,
        options: CompositeOptions,
    ) -> Result<(), RenderError> {
        self.enqueue(QueuedOp::Composite { image, options })
    }

    fn enqueue(&mut self, op: QueuedOp) -> Result<(), RenderError> {
        if self.deferred && self.state != ObjectState::Finalized {
            self.queue.push(op);
            return Ok(());
        }
        let canvas = self.canvas_mut()?;
        apply(canvas, op)
    }

    /// Finalize a plain object.
    ///
    /// Deferred objects create their canvas at the effective resolution and
    /// replay the queue. Eager objects are resampled to the forced pixel
    /// size, if any.
    pub fn finalize(
        &mut self,
        engine: &dyn RasterEngine,
        options: &RenderOptions<'_>,
    ) -> Result<&Raster, RenderError> {
        self.begin_finalize()?;

        if self.deferred {
            let resolution = options.force_resolution.unwrap_or(self.resolution);
            let size = self.target_pixel_size(options, resolution)?;
            self.create_canvas(engine, size)?;
            self.replay_queue()?;
        } else if let Some((width, height)) = options.force_pixel_size {
            self.resize_canvas(engine, width, height)?;
        }

        self.finish()
    }

    /// Fail if this object was already finalized.
    pub(crate) fn begin_finalize(&self) -> Result<(), RenderError> {
        if self.state == ObjectState::Finalized {
            return Err(RenderError::AlreadyFinalized);
        }
        Ok(())
    }

    /// Pixel size to render at: the forced size, else the own size.
    pub(crate) fn target_pixel_size(
        &self,
        options: &RenderOptions<'_>,
        resolution: u32,
    ) -> Result<(u32, u32), ConfigError> {
        if let Some(size) = options.force_pixel_size {
            return Ok(size);
        }
        if self.size_mm.x > 0.0 && self.size_mm.y > 0.0 {
            return Ok(units::size_to_px(self.size_mm, resolution));
        }
        Err(ConfigError::UnresolvedSize {
            width: self.size_mm.x,
            height: self.size_mm.y,
        })
    }

    /// Create the blank canvas.
    pub(crate) fn create_canvas(
        &mut self,
        engine: &dyn RasterEngine,
        (width, height): (u32, u32),
    ) -> Result<(), RenderError> {
        self.set_canvas(engine.canvas(width, height)?);
        Ok(())
    }

    /// Install an already rendered canvas.
    pub(crate) fn set_canvas(&mut self, raster: Raster) {
        self.image = Some(raster);
        self.state = ObjectState::BaseCreated;
    }

    /// Resample the existing canvas to an exact pixel size.
    pub(crate) fn resize_canvas(
        &mut self,
        engine: &dyn RasterEngine,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let canvas = self.canvas_mut()?;
        if canvas.dimensions() == (width, height) {
            return Ok(());
        }
        *canvas = if width == 0 || height == 0 {
            engine.canvas(width, height)?
        } else {
            engine.resize(canvas, width, height)?
        };
        Ok(())
    }

    pub(crate) fn canvas_mut(&mut self) -> Result<&mut Raster, RenderError> {
        self.image.as_mut().ok_or(RenderError::NoCanvas)
    }

    /// Apply every queued operation in FIFO order, leaving the queue empty.
    pub(crate) fn replay_queue(&mut self) -> Result<(), RenderError> {
        let queue = std::mem::take(&mut self.queue);
        let canvas = self.canvas_mut()?;
        for op in queue {
            apply(canvas, op)?;
        }
        Ok(())
    }

    /// Mark finalized and hand out the raster.
    pub(crate) fn finish(&mut self) -> Result<&Raster, RenderError> {
        self.state = ObjectState::Finalized;
        self.image.as_ref().ok_or(RenderError::NoCanvas)
    }
}

fn apply(canvas: &mut Raster, op: QueuedOp) -> Result<(), RenderError> {
    match op {
        QueuedOp::Mutate(edit) => edit(canvas),
        QueuedOp::Composite { image, options } => {
            canvas.composite(&image, options);
            Ok(())
        }
    }
}

/// Shared interface of all visual objects.
pub trait Visual {
    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    /// Render this object, replaying its queue, and return the result.
    ///
    /// Objects are finalized once; a second call fails with
    /// [`RenderError::AlreadyFinalized`].
    fn finalize(
        &mut self,
        engine: &dyn RasterEngine,
        options: &RenderOptions<'_>,
    ) -> Result<&Raster, RenderError>;

    /// Queue an in-place edit of this object's raster.
    fn queue_mutate<F>(&mut self, op: F) -> Result<(), RenderError>
    where
        F: FnOnce(&mut Raster) -> Result<(), RenderError> + 'static,
        Self: Sized,
    {
        self.base_mut().queue_mutate(op)
    }

    /// Queue a composite of another raster onto this object's raster.
    fn queue_composite(
        &mut self,
        image: Raster,
        options: CompositeOptions,
    ) -> Result<(), RenderError> {
        self.base_mut().queue_composite(image, options)
    }

    fn position_mm(&self) -> DVec2 {
        self.base().position_mm
    }

    fn size_mm(&self) -> DVec2 {
        self.base().size_mm
    }

    fn resolution(&self) -> u32 {
        self.base().resolution
    }

    /// The rendered raster, once finalized.
    fn image(&self) -> Option<&Raster> {
        self.base().image()
    }
}
