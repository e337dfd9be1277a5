//! Property-based tests for register-map addressing and variant lookup.

// Integration test file -- intentional test patterns permitted.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use embassy_futures::block_on;
use embedded_hal_mock::eh1::spi::Mock as SpiMock;
use platform::{bootstrap, bootstrap_named, BootstrapError, CodecVariant, TransportError, VARIANT_TABLE};
use proptest::prelude::*;

fn any_variant() -> impl Strategy<Value = CodecVariant> {
    prop::sample::select(CodecVariant::ALL.to_vec())
}

proptest! {
    /// `accepts` is exactly "in range and on the stride".
    #[test]
    fn accepts_matches_range_and_stride(row in 0..VARIANT_TABLE.len(), reg in any::<u32>()) {
        let desc = &VARIANT_TABLE[row];
        for map in [desc.regmap_16bit, desc.regmap_32bit] {
            let expected = reg <= map.max_register && reg % u32::from(map.reg_stride) == 0;
            prop_assert_eq!(map.accepts(reg), expected);
        }
    }

    /// Addresses the map rejects never produce a bus transaction.
    #[test]
    fn rejected_32bit_addresses_stay_off_the_bus(variant in any_variant(), reg in any::<u32>()) {
        let mut spi = SpiMock::<u8>::new(&[]);
        let mut bus = bootstrap(spi.clone(), variant).unwrap();
        if !bus.regmap_32bit().accepts(reg) {
            let err = block_on(bus.write32(reg, 0)).unwrap_err();
            let expected_kind = matches!(
                err,
                TransportError::Misaligned { .. } | TransportError::OutOfRange { .. }
            );
            prop_assert!(expected_kind);
        }
        drop(bus);
        spi.done();
    }

    /// Only bus id-table names bootstrap; anything else is `UnknownVariant`.
    #[test]
    fn bootstrap_named_accepts_only_table_names(name in "[a-z0-9]{0,8}") {
        let mut spi = SpiMock::<u8>::new(&[]);
        match CodecVariant::from_name(&name) {
            Some(v) => {
                prop_assert_eq!(v.name(), name.as_str());
                prop_assert_eq!(bootstrap_named(spi.clone(), &name).map(|b| b.variant()).ok(), Some(v));
            }
            None => {
                prop_assert_eq!(
                    bootstrap_named(spi.clone(), &name).err(),
                    Some(BootstrapError::UnknownVariant)
                );
            }
        }
        spi.done();
    }

    /// Device-tree compatibles resolve to the same part as the bare name.
    #[test]
    fn compatible_resolves_like_name(variant in any_variant()) {
        let compatible = format!("cirrus,{}", variant.name());
        prop_assert_eq!(CodecVariant::from_compatible(&compatible), Some(variant));
        prop_assert_eq!(CodecVariant::from_compatible(variant.name()), None);
    }
}
