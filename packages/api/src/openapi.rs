use mangoscan::{Diagnosis, RankedCandidate};
use utoipa::OpenApi;

use crate::routes::{analyze::AnalyzeUpload, health::HealthResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MangoScan API",
        version = "1.0.0",
        description = "Leaf disease diagnosis from a single photo.\n\nUpload an image to `/analyze` as `multipart/form-data` (field `image`). Results below the configured minimum confidence are reported as `Uncertain` with a warning; the pre-gate prediction stays available in `rawPrediction` and `topPredictions`.\n\nThe gate compares the unrounded top-1 confidence with `minConfidence`; the reported `confidence` is rounded to 4 decimals afterwards, so a result just below the threshold can display as equal to it while `lowConfidence` is true.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::health::health,
        crate::routes::analyze::analyze,
    ),
    components(schemas(Diagnosis, RankedCandidate, HealthResponse, AnalyzeUpload)),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "diagnosis", description = "Leaf disease diagnosis")
    )
)]
pub struct ApiDoc;
