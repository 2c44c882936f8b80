//! Compile-time interface of the ModelRegistry contract.
//!
//! One fixed contract version; the interface is declared here once
//! instead of being loaded from a JSON artifact at runtime. Field and
//! argument names follow the Solidity source.

use alloy::sol;

sol! {
    /// One entry in a model's append-only validation history.
    struct Validation {
        address validator;
        uint256 timestamp;
        bool isValid;
        string comments;
    }

    /// Register a model; the contract derives the identifier from
    /// `(name, version)` and reverts with "Model already exists" on
    /// resubmission.
    function registerModel(string name, string version, string metadataURI) returns (bytes32);

    /// Append a validation. Reverts with "Model does not exist" for an
    /// unknown identifier and "Owner cannot validate own model" when the
    /// sender registered the model.
    function validateModel(bytes32 modelId, bool isValid, string comments);

    /// Read a model record. Reverts with "Model does not exist" for an
    /// unknown identifier.
    function getModel(bytes32 modelId) view returns (
        string name,
        string version,
        string metadataURI,
        address owner,
        uint256 registeredAt,
        bool isActive
    );

    /// Read a model's validation history in append order.
    function getModelValidations(bytes32 modelId) view returns (Validation[] validations);

    /// Number of registered models.
    function getModelCount() view returns (uint256);

    /// Identifier of the n-th registered model; indexes are 1-based.
    function getModelIdAt(uint256 index) view returns (bytes32);

    /// Emitted once per successful registration.
    #[derive(Debug)]
    event ModelRegistered(bytes32 indexed modelId, string name, string version, address indexed owner);

    /// Emitted once per appended validation.
    #[derive(Debug)]
    event ModelValidated(bytes32 indexed modelId, address indexed validator, bool isValid, string comments);
}
