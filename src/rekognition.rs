use crate::config::RekognitionConfig;
use crate::detector::{
    DetectionParams, DetectorError, LabelBoundingBox, LabelDetector, LabelInstance, LabelRecord,
    NamedLabel,
};
use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region};
use aws_sdk_rekognition::{
    error::DisplayErrorContext,
    primitives::Blob,
    types::{BoundingBox, Image, Instance, Label},
    Client,
};
use tracing::instrument;

/// Label detection backed by AWS Rekognition `DetectLabels`.
///
/// The client is built once and shared by every request.
#[derive(Debug, Clone)]
pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    pub async fn new(config: &RekognitionConfig) -> Self {
        let region =
            RegionProviderChain::default_provider().or_else(Region::new(config.region.clone()));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;

        tracing::info!(
            "Rekognition client ready in region {}",
            sdk_config
                .region()
                .map(|region| region.as_ref())
                .unwrap_or("unknown")
        );

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    #[instrument(skip(self, image))]
    async fn detect_labels(
        &self,
        image: Vec<u8>,
        params: &DetectionParams,
    ) -> Result<Vec<LabelRecord>, DetectorError> {
        let output = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .max_labels(params.max_labels)
            .min_confidence(params.min_confidence)
            .send()
            .await
            .map_err(|e| DetectorError::Provider(DisplayErrorContext(&e).to_string()))?;

        Ok(output.labels().iter().map(to_label_record).collect())
    }
}

fn to_label_record(label: &Label) -> LabelRecord {
    LabelRecord {
        name: label.name().map(str::to_string),
        confidence: label.confidence(),
        instances: label
            .instances
            .as_ref()
            .map(|instances| instances.iter().map(to_label_instance).collect()),
        parents: label
            .parents
            .as_ref()
            .map(|parents| parents.iter().map(|parent| named(parent.name())).collect()),
        aliases: label
            .aliases
            .as_ref()
            .map(|aliases| aliases.iter().map(|alias| named(alias.name())).collect()),
        categories: label.categories.as_ref().map(|categories| {
            categories
                .iter()
                .map(|category| named(category.name()))
                .collect()
        }),
    }
}

fn to_label_instance(instance: &Instance) -> LabelInstance {
    LabelInstance {
        bounding_box: instance.bounding_box().map(to_bounding_box),
        confidence: instance.confidence(),
    }
}

fn to_bounding_box(bbox: &BoundingBox) -> LabelBoundingBox {
    LabelBoundingBox {
        width: bbox.width(),
        height: bbox.height(),
        left: bbox.left(),
        top: bbox.top(),
    }
}

fn named(name: Option<&str>) -> NamedLabel {
    NamedLabel {
        name: name.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rekognition::types::{LabelAlias, LabelCategory, Parent};

    #[test]
    fn test_to_label_record_copies_provider_fields() {
        let label = Label::builder()
            .name("Person")
            .confidence(91.2)
            .instances(
                Instance::builder()
                    .bounding_box(
                        BoundingBox::builder()
                            .width(0.5)
                            .height(0.75)
                            .left(0.25)
                            .top(0.125)
                            .build(),
                    )
                    .confidence(90.0)
                    .build(),
            )
            .parents(Parent::builder().name("Human").build())
            .aliases(LabelAlias::builder().name("Human").build())
            .categories(LabelCategory::builder().name("Person Description").build())
            .build();

        let record = to_label_record(&label);

        assert_eq!(record.name.as_deref(), Some("Person"));
        assert_eq!(record.confidence, Some(91.2));
        let instances = record.instances.unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(
            instances[0].bounding_box,
            Some(LabelBoundingBox {
                width: Some(0.5),
                height: Some(0.75),
                left: Some(0.25),
                top: Some(0.125),
            })
        );
        assert_eq!(record.parents.unwrap()[0].name.as_deref(), Some("Human"));
        assert_eq!(record.aliases.unwrap()[0].name.as_deref(), Some("Human"));
        assert_eq!(
            record.categories.unwrap()[0].name.as_deref(),
            Some("Person Description")
        );
    }

    #[test]
    fn test_to_label_record_with_sparse_label() {
        let record = to_label_record(&Label::builder().name("Tree").build());

        assert_eq!(record.name.as_deref(), Some("Tree"));
        assert_eq!(record.confidence, None);
        assert!(record.instances.is_none());
        assert!(record.parents.is_none());
    }

    #[test]
    fn test_empty_provider_lists_are_kept() {
        let label = Label::builder()
            .name("Outdoors")
            .confidence(99.0)
            .set_instances(Some(vec![]))
            .set_parents(Some(vec![]))
            .build();

        let record = to_label_record(&label);

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({
                "Name": "Outdoors",
                "Confidence": 99.0,
                "Instances": [],
                "Parents": []
            })
        );
    }
}
