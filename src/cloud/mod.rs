/// Temporary credential exchange via the cloud CLI's security token service
pub mod sts;

/// Archive publishing via the cloud CLI's object-store transfer
pub mod s3;
