//! Contract bindings for the token and router calls made by the swap client
#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use alloy::sol;

sol! {
    /// The subset of the ERC-20 interface used for approvals
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

sol! {
    /// The THORChain router's deposit entrypoint
    interface IThorRouter {
        function depositWithExpiry(
            address vault,
            address asset,
            uint256 amount,
            string memo,
            uint256 expiry
        ) external payable;
    }
}
