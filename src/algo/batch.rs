//! Per-vertex descriptor evaluation over a whole mesh.
//!
//! Every vertex is an independent query: one sphere centered at the vertex,
//! one graph, one descriptor. The mesh is shared read-only between worker
//! threads, and every result lands at its vertex's index.
//!
//! A query that fails (see [`MsiiError::ImpossibleIntersection`]) does not
//! abort the run. Its vertex gets `NaN` (or no points) and the error is kept
//! in [`BatchResult::failures`].
//!
//! # Example
//!
//! ```no_run
//! use msii::prelude::*;
//! use msii::algo::batch::{compute, BatchOptions};
//!
//! let mesh: Mesh = msii::io::load("scan.ply").unwrap();
//! let options = BatchOptions::new(0.5, Descriptor::SphereVolume).with_chunk_size(256);
//!
//! let result = compute(&mesh, &options).unwrap();
//! for failure in result.failures() {
//!     eprintln!("vertex {}: {}", failure.vertex, failure.error);
//! }
//! ```

use std::time::Instant;

use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::progress::ProgressCounter;
use super::{Descriptor, DescriptorValue, Progress};
use crate::error::{MsiiError, Result};
use crate::graph::{Graph, DEFAULT_TOLERANCE};
use crate::math::Sphere;
use crate::mesh::{Mesh, MeshIndex, VertexId};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Sphere radius, in mesh units.
    pub radius: f64,
    /// Descriptor evaluated at every vertex.
    pub descriptor: Descriptor,
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
    /// Number of worker threads; `None` uses rayon's global pool.
    pub threads: Option<usize>,
    /// Number of vertices handed to a worker at a time, and the progress
    /// reporting granularity.
    pub chunk_size: usize,
    /// Tolerance for degenerate arc geometry.
    pub tolerance: f64,
}

impl BatchOptions {
    /// Options for `descriptor` with an absolute sphere radius.
    pub fn new(radius: f64, descriptor: Descriptor) -> Self {
        Self {
            radius,
            descriptor,
            parallel: true,
            threads: None,
            chunk_size: 1024,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Set the number of worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the degeneracy tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Check that all parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(MsiiError::invalid_param(
                "radius",
                self.radius,
                "must be positive and finite",
            ));
        }
        if self.chunk_size == 0 {
            return Err(MsiiError::invalid_param("chunk_size", 0, "must be at least 1"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MsiiError::invalid_param(
                "tolerance",
                self.tolerance,
                "must be positive and finite",
            ));
        }
        if self.threads == Some(0) {
            return Err(MsiiError::invalid_param("threads", 0, "must be at least 1"));
        }
        Ok(())
    }
}

/// A vertex whose query failed.
#[derive(Debug)]
pub struct VertexFailure {
    /// Index of the vertex.
    pub vertex: usize,
    /// Why the query failed.
    pub error: MsiiError,
}

/// Per-vertex results of a batch run.
#[derive(Debug)]
pub struct BatchResult {
    descriptor: Descriptor,
    values: Vec<DescriptorValue>,
    failures: Vec<VertexFailure>,
}

impl BatchResult {
    /// The evaluated descriptor.
    #[inline]
    pub fn descriptor(&self) -> Descriptor {
        self.descriptor
    }

    /// One value per vertex, in vertex order.
    #[inline]
    pub fn values(&self) -> &[DescriptorValue] {
        &self.values
    }

    /// Queries that failed, in vertex order.
    #[inline]
    pub fn failures(&self) -> &[VertexFailure] {
        &self.failures
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One scalar per vertex, or `None` for a point descriptor.
    pub fn scalars(&self) -> Option<Vec<f64>> {
        self.values.iter().map(DescriptorValue::as_scalar).collect()
    }

    /// Intersection points per vertex; empty for scalar descriptors.
    pub fn points(&self) -> impl Iterator<Item = (usize, &[Point3<f64>])> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(vertex, value)| value.as_points().map(|points| (vertex, points)))
    }
}

/// Evaluate the descriptor at every vertex of the mesh.
///
/// # Errors
///
/// Fails only for invalid options or if the thread pool cannot be created.
/// Individual vertex failures are reported in the result.
pub fn compute<I: MeshIndex>(mesh: &Mesh<I>, options: &BatchOptions) -> Result<BatchResult> {
    compute_internal(mesh, options, None)
}

/// Evaluate the descriptor at every vertex, reporting progress per chunk.
///
/// See [`compute`] for details.
pub fn compute_with_progress<I: MeshIndex>(
    mesh: &Mesh<I>,
    options: &BatchOptions,
    progress: &Progress,
) -> Result<BatchResult> {
    compute_internal(mesh, options, Some(progress))
}

fn compute_internal<I: MeshIndex>(
    mesh: &Mesh<I>,
    options: &BatchOptions,
    progress: Option<&Progress>,
) -> Result<BatchResult> {
    options.validate()?;

    let start = Instant::now();
    let num_vertices = mesh.num_vertices();
    info!(
        vertices = num_vertices,
        descriptor = %options.descriptor,
        radius = options.radius,
        parallel = options.parallel,
        "starting batch"
    );

    let silent = Progress::none();
    let counter = progress
        .unwrap_or(&silent)
        .counter(num_vertices, "Evaluating descriptor");

    let outcomes = match options.threads {
        Some(threads) if options.parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|_| {
                    MsiiError::invalid_param("threads", threads, "could not start thread pool")
                })?;
            debug!(threads, "using dedicated thread pool");
            pool.install(|| evaluate_all(mesh, options, &counter))
        }
        _ => evaluate_all(mesh, options, &counter),
    };

    let mut values = Vec::with_capacity(num_vertices);
    let mut failures = Vec::new();
    for (value, failure) in outcomes {
        values.push(value);
        failures.extend(failure);
    }

    info!(
        vertices = num_vertices,
        failures = failures.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch finished"
    );

    Ok(BatchResult {
        descriptor: options.descriptor,
        values,
        failures,
    })
}

type Outcome = (DescriptorValue, Option<VertexFailure>);

fn evaluate_all<I: MeshIndex>(
    mesh: &Mesh<I>,
    options: &BatchOptions,
    counter: &ProgressCounter<'_>,
) -> Vec<Outcome> {
    let indices: Vec<usize> = (0..mesh.num_vertices()).collect();
    let run_chunk = |chunk: &[usize]| -> Vec<Outcome> {
        let outcomes = chunk
            .iter()
            .map(|&vertex| evaluate_vertex(mesh, vertex, options))
            .collect();
        counter.advance(chunk.len());
        outcomes
    };

    if options.parallel {
        indices
            .par_chunks(options.chunk_size)
            .flat_map_iter(run_chunk)
            .collect()
    } else {
        indices
            .chunks(options.chunk_size)
            .flat_map(run_chunk)
            .collect()
    }
}

fn evaluate_vertex<I: MeshIndex>(mesh: &Mesh<I>, vertex: usize, options: &BatchOptions) -> Outcome {
    let seed = VertexId::new(vertex);
    let result = Sphere::new(*mesh.position(seed), options.radius)
        .and_then(|sphere| Graph::new(mesh, seed, sphere))
        .map(|graph| options.descriptor.apply(graph.with_tolerance(options.tolerance)));

    match result {
        Ok(value) => (value, None),
        Err(error) => {
            warn!(vertex, %error, "vertex query failed");
            let placeholder = if options.descriptor.is_scalar() {
                DescriptorValue::Scalar(f64::NAN)
            } else {
                DescriptorValue::Points(Vec::new())
            };
            (placeholder, Some(VertexFailure { vertex, error }))
        }
    }
}
