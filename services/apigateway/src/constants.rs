// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

// Signing constants.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE: &str = "apigateway";
pub const TERMINATOR: &str = "aws4_request";
pub const SIGNED_HEADERS: &str = "host;x-amz-date";

// Headers used in api gateway requests and responses.
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZN_ERROR_TYPE: &str = "x-amzn-errortype";
pub const X_AMZN_REQUEST_ID: &str = "x-amzn-requestid";

// Env values used to build the signing config.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const GWEXPORT_REST_API_ID: &str = "GWEXPORT_REST_API_ID";
pub const GWEXPORT_STAGE: &str = "GWEXPORT_STAGE";
