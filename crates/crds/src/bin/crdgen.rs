//! Prints the FoundationDBCluster CRD manifest as YAML.

use crds::FoundationDBCluster;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&FoundationDBCluster::crd())?);
    Ok(())
}
