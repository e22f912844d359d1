use ethers::contract::abigen;

abigen!(
    CreathMarketplace,
    r#"[
        function initialize(address treasury, uint256 platformFee) public
    ]"#
);
