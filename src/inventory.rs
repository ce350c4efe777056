use crate::console::print_debug;
use crate::error::{HopError, Result};
use anyhow::anyhow;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Instance;
use serde::{Deserialize, Serialize};

/// One EC2 instance as seen at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub instance_id: String,
    pub tags: Vec<(String, String)>,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub state: Option<String>,
    pub instance_type: Option<String>,
}

impl InstanceRecord {
    /// Value of the first `Name` tag, if any.
    pub fn name(&self) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == "Name")
            .map(|(_, value)| value.as_str())
    }
}

/// Everything one `DescribeInstances` listing returned for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub region: String,
    pub instances: Vec<InstanceRecord>,
}

pub struct FetchSettings {
    pub region: String,
    pub profile: Option<String>,
    pub verbose: bool,
}

async fn get_aws_config(region: &str, profile: Option<&str>) -> SdkConfig {
    // Credentials come from the SDK's default chain; only region and profile
    // are set explicitly.
    let mut config_loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()));

    if let Some(profile) = profile {
        config_loader = config_loader.profile_name(profile);
    }

    config_loader.load().await
}

async fn validate_aws_config(config: &SdkConfig, verbose: bool) -> anyhow::Result<()> {
    print_debug("Validating AWS configuration...", verbose);

    let sts_client = aws_sdk_sts::Client::new(config);

    match sts_client.get_caller_identity().send().await {
        Ok(identity) => {
            print_debug(
                &format!(
                    "Authenticated as {} (account {})",
                    identity.arn().unwrap_or("unknown"),
                    identity.account().unwrap_or("unknown")
                ),
                verbose,
            );
            Ok(())
        }
        Err(e) => Err(anyhow!(
            "Failed to authenticate with AWS: {}",
            DisplayErrorContext(&e)
        )),
    }
}

async fn describe_all_instances(
    ec2_client: &aws_sdk_ec2::Client,
    verbose: bool,
) -> anyhow::Result<Vec<InstanceRecord>> {
    let mut pages = ec2_client.describe_instances().into_paginator().send();
    let mut instances = Vec::new();
    let mut page_count = 0;

    while let Some(page) = pages.next().await {
        let page =
            page.map_err(|e| anyhow!("DescribeInstances failed: {}", DisplayErrorContext(&e)))?;
        page_count += 1;

        for reservation in page.reservations() {
            for instance in reservation.instances() {
                let record = to_record(instance);
                print_debug(
                    &format!(
                        "{} ({}, {}) {}",
                        record.instance_id,
                        record.instance_type.as_deref().unwrap_or("N/A"),
                        record.state.as_deref().unwrap_or("N/A"),
                        record.name().unwrap_or("<no Name tag>")
                    ),
                    verbose,
                );
                instances.push(record);
            }
        }
    }

    print_debug(
        &format!(
            "Fetched {} instances in {} page(s)",
            instances.len(),
            page_count
        ),
        verbose,
    );

    Ok(instances)
}

pub fn to_record(instance: &Instance) -> InstanceRecord {
    let tags: Vec<(String, String)> = instance
        .tags()
        .iter()
        .filter_map(|tag| {
            if let (Some(key), Some(value)) = (tag.key(), tag.value()) {
                Some((key.to_string(), value.to_string()))
            } else {
                None
            }
        })
        .collect();

    InstanceRecord {
        instance_id: instance.instance_id().unwrap_or("Unknown").to_string(),
        tags,
        public_ip: instance.public_ip_address().map(|ip| ip.to_string()),
        private_ip: instance.private_ip_address().map(|ip| ip.to_string()),
        state: instance
            .state()
            .and_then(|s| s.name())
            .map(|n| n.as_str().to_string()),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
    }
}

/// Lists every instance in `settings.region`. Any SDK failure aborts the run.
pub async fn fetch(settings: &FetchSettings) -> Result<InventorySnapshot> {
    let to_fetch_error = |e: anyhow::Error| HopError::Fetch {
        region: settings.region.clone(),
        reason: format!("{:#}", e),
    };

    print_debug(
        &format!(
            "Profile: {}",
            settings.profile.as_deref().unwrap_or("default")
        ),
        settings.verbose,
    );

    let config = get_aws_config(&settings.region, settings.profile.as_deref()).await;
    validate_aws_config(&config, settings.verbose)
        .await
        .map_err(to_fetch_error)?;

    let ec2_client = aws_sdk_ec2::Client::new(&config);
    let instances = describe_all_instances(&ec2_client, settings.verbose)
        .await
        .map_err(to_fetch_error)?;

    Ok(InventorySnapshot {
        region: settings.region.clone(),
        instances,
    })
}
