use crate::{
    pipeline::Pipeline,
    traits::{ImagePreprocessor, ContourExtractor, CurvePostProcessor},
    algorithms::{
        AreaSortProcessor,
        CannyEdgeDetector,
        DilatePreprocessor,
        ImageprocContourExtractor,
        MinLengthFilter,
    },
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    postprocessors: Vec<Box<dyn CurvePostProcessor>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            contour_extractor: None,
            postprocessors: Vec::new(),
        }
    }

    /// Add a mask stage to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Add a curve stage to the pipeline
    pub fn add_postprocessor<P>(mut self, postprocessor: P) -> Self
    where
        P: CurvePostProcessor + 'static,
    {
        self.postprocessors.push(Box::new(postprocessor));
        self
    }

    /// Add hysteresis edge detection as a mask stage
    pub fn with_canny(self, low_threshold: u32, high_threshold: u32) -> Self {
        self.add_preprocessor(CannyEdgeDetector::new(low_threshold, high_threshold))
    }

    /// Add one 3x3 dilation pass as a mask stage
    pub fn with_dilation(self) -> Self {
        self.add_preprocessor(DilatePreprocessor::default())
    }

    /// Drop curves shorter than `min_length` points
    pub fn with_min_length(self, min_length: usize) -> Self {
        self.add_postprocessor(MinLengthFilter::new(min_length))
    }

    /// Order curves by descending enclosed area
    pub fn with_area_ordering(self) -> Self {
        self.add_postprocessor(AreaSortProcessor)
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ImageprocContourExtractor));

        Pipeline::new(
            self.preprocessors,
            contour_extractor,
            self.postprocessors,
        )
    }

    /// Canny, one dilation, flat tracing, length filter, area ordering
    pub fn build_standard(low_threshold: u32, high_threshold: u32, min_length: usize) -> Pipeline {
        Self::new()
            .with_canny(low_threshold, high_threshold)
            .with_dilation()
            .with_min_length(min_length)
            .with_area_ordering()
            .build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
