/// Configuration for the built-in k-means provider
#[derive(Debug, Clone)]
pub struct KMeansConfig {
    /// Maximum number of Lloyd iterations per run
    pub max_iters: usize,

    /// Convergence tolerance. When centroid shift is below this threshold,
    /// the run stops early. Set to negative value to disable early stopping.
    pub tol: f64,

    /// Random seed for k-means++ seeding and empty-cluster reseeding.
    /// Run `i` of `n_init` uses `seed + i`.
    pub seed: u64,

    /// Number of independently seeded runs. The run with the lowest inertia wins.
    pub n_init: usize,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iters: 300,
            tol: 1e-4,
            seed: 0,
            n_init: 10,
        }
    }
}

impl KMeansConfig {
    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of restarts (at least one run always happens)
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }
}

/// Size and text size of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureStyle {
    pub width: f64,
    pub height: f64,
    pub text_size: f64,
}

impl FigureStyle {
    pub fn new(width: f64, height: f64, text_size: f64) -> Self {
        Self {
            width,
            height,
            text_size,
        }
    }

    /// Style used for the elbow and average silhouette line charts
    pub fn line() -> Self {
        Self::new(16.0, 8.0, 15.0)
    }

    /// Style used for the per-k silhouette panels
    pub fn panel() -> Self {
        Self::new(10.0, 5.0, 12.0)
    }
}

/// Configuration for [`KMeansEvaluator`](crate::KMeansEvaluator)
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Default candidate cluster counts, evaluated in order
    pub k_range: Vec<usize>,

    /// Parameters of the built-in k-means provider
    pub kmeans: KMeansConfig,

    /// Style of line charts (elbow, average silhouette)
    pub line_style: FigureStyle,

    /// Style of silhouette panels
    pub panel_style: FigureStyle,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            k_range: (2..=10).collect(),
            kmeans: KMeansConfig::default(),
            line_style: FigureStyle::line(),
            panel_style: FigureStyle::panel(),
        }
    }
}

impl EvaluatorConfig {
    /// Create a configuration evaluating the given k values
    pub fn new<I: IntoIterator<Item = usize>>(k_range: I) -> Self {
        Self {
            k_range: k_range.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Set the k-means parameters
    pub fn with_kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Set the random seed of the built-in provider
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.kmeans.seed = seed;
        self
    }

    /// Set the line chart style
    pub fn with_line_style(mut self, style: FigureStyle) -> Self {
        self.line_style = style;
        self
    }

    /// Set the silhouette panel style
    pub fn with_panel_style(mut self, style: FigureStyle) -> Self {
        self.panel_style = style;
        self
    }
}
