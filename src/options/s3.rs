// Copyright 2025 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! S3-compatible object storage options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{check_url, OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "s3";

/// Object storage used for build artifacts and uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct S3Options {
    /// Object storage endpoint. Empty disables S3.
    pub endpoint: String,
    /// Region the bucket lives in.
    pub region: String,
    /// Talk plain HTTP to the endpoint.
    #[serde(rename = "disableSSL")]
    pub disable_ssl: bool,
    /// Address buckets as `endpoint/bucket` instead of by subdomain.
    pub force_path_style: bool,
    /// Access key id.
    #[serde(rename = "accessKeyID")]
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: String,
    /// Bucket holding uploaded binaries.
    pub bucket: String,
}

impl Default for S3Options {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: "us-east-1".to_string(),
            disable_ssl: true,
            force_path_style: true,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: String::new(),
            bucket: "s2i-binaries".to_string(),
        }
    }
}

impl OptionGroup for S3Options {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.string_var(
            "s3-endpoint",
            &self.endpoint,
            "Endpoint to access to s3 object storage service, if left blank, the following \
             options will be ignored.",
        );
        fs.string_var(
            "s3-region",
            &self.region,
            "Region of s3 that will access to, like us-east-1.",
        );
        fs.bool_var("s3-disable-SSL", self.disable_ssl, "Disable SSL when accessing s3.");
        fs.bool_var(
            "s3-force-path-style",
            self.force_path_style,
            "Force path style addressing instead of virtual-hosted buckets.",
        );
        fs.string_var("s3-access-key-id", &self.access_key_id, "Access key of s3.");
        fs.string_var(
            "s3-secret-access-key",
            &self.secret_access_key,
            "Secret access key of s3.",
        );
        fs.string_var("s3-session-token", &self.session_token, "Session token of s3.");
        fs.string_var("s3-bucket", &self.bucket, "Bucket name of s3.");
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "s3-endpoint", &mut self.endpoint);
        flag::assign(matches, "s3-region", &mut self.region);
        flag::assign(matches, "s3-disable-SSL", &mut self.disable_ssl);
        flag::assign(matches, "s3-force-path-style", &mut self.force_path_style);
        flag::assign(matches, "s3-access-key-id", &mut self.access_key_id);
        flag::assign(matches, "s3-secret-access-key", &mut self.secret_access_key);
        flag::assign(matches, "s3-session-token", &mut self.session_token);
        flag::assign(matches, "s3-bucket", &mut self.bucket);
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();
        if self.endpoint.is_empty() {
            return errs;
        }

        errs.extend(check_url(NAME, "s3-endpoint", &self.endpoint));
        if self.bucket.is_empty() {
            errs.push(ValidationError::invalid(
                NAME,
                "bucket must be set when an endpoint is configured",
            ));
        }
        errs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_checks() {
        let mut options = S3Options {
            endpoint: "http://minio.kubesphere-system.svc:9000".to_string(),
            ..Default::default()
        };
        assert!(options.validate().is_empty());

        options.bucket.clear();
        assert_eq!(options.validate().len(), 1);

        options.endpoint = "not a url".to_string();
        options.bucket = "b".to_string();
        assert_eq!(options.validate().len(), 1);
    }

    #[test]
    fn test_yaml_keys() {
        let options: S3Options = serde_yaml::from_str(
            "endpoint: http://minio:9000\ndisableSSL: false\naccessKeyID: abc\n",
        )
        .unwrap();
        assert!(!options.disable_ssl);
        assert_eq!(options.access_key_id, "abc");
        assert_eq!(options.bucket, "s2i-binaries");
    }
}
