//! Unit tests for the TWAI message conversions and install configuration.
use super::*;

//==================================================================================CONVERSIONS
#[test]
/// Extended and remote flags map onto the driver flag bits.
fn test_frame_flags_to_message() {
    let cases = [
        (false, false, 0),
        (true, false, TWAI_MSG_FLAG_EXTD),
        (false, true, TWAI_MSG_FLAG_RTR),
        (true, true, TWAI_MSG_FLAG_EXTD | TWAI_MSG_FLAG_RTR),
    ];
    for (extended, remote, flags) in cases {
        let frame = CanFrame::builder()
            .extended(extended)
            .remote(remote)
            .build();
        assert_eq!(TwaiMessage::from(&frame).flags, flags);
    }
}

#[test]
fn test_frame_payload_to_message() {
    let frame = CanFrame::builder()
        .id(0x18DA_F110)
        .extended(true)
        .data(&[0x03, 0x22, 0xF1, 0x90])
        .build();
    let msg = TwaiMessage::from(&frame);

    assert_eq!(msg.id, 0x18DA_F110);
    assert_eq!(msg.data_length_code, 4);
    assert_eq!(msg.data, [0x03, 0x22, 0xF1, 0x90, 0, 0, 0, 0]);
}

#[test]
/// Unrelated flag bits from the driver (single shot, self reception) are ignored.
fn test_message_to_frame() {
    let msg = TwaiMessage {
        flags: TWAI_MSG_FLAG_EXTD | TWAI_MSG_FLAG_SS | TWAI_MSG_FLAG_SELF,
        id: 0x0CF0_0400,
        data_length_code: 8,
        data: [1, 2, 3, 4, 5, 6, 7, 8],
    };
    let frame = CanFrame::from(&msg);

    assert_eq!(frame.raw_id(), 0x0CF0_0400);
    assert!(frame.is_extended());
    assert!(!frame.is_remote());
    assert_eq!(frame.data(), &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
/// DLC values 9..=15 are legal on the wire but carry only eight bytes.
fn test_message_dlc_is_clamped() {
    for dlc in 9..=15u8 {
        let msg = TwaiMessage {
            data_length_code: dlc,
            ..TwaiMessage::default()
        };
        assert_eq!(CanFrame::from(&msg).len(), 8);
    }
}

//==================================================================================INSTALL_CONFIG
#[test]
fn test_general_config_from_defaults() {
    let general = TwaiGeneralConfig::from(&TwaiConfig::default());
    assert_eq!(general.mode, TwaiMode::Normal);
    assert_eq!(general.tx_io, 10);
    assert_eq!(general.rx_io, 9);
    assert_eq!(general.clkout_io, TWAI_IO_UNUSED);
    assert_eq!(general.bus_off_io, TWAI_IO_UNUSED);
    assert_eq!(general.tx_queue_len, 32);
    assert_eq!(general.rx_queue_len, 32);
    assert_eq!(general.alerts_enabled, TWAI_ALERT_NONE);
    assert_eq!(general.clkout_divider, 0);
    assert_eq!(general.intr_flags, INTR_FLAG_LEVEL1);
}

#[test]
fn test_general_config_custom_pins() {
    let config = TwaiConfig::new().with_pins(5, 4).with_queue_lengths(1, 8);
    let general = TwaiGeneralConfig::from(&config);
    assert_eq!((general.tx_io, general.rx_io), (5, 4));
    assert_eq!((general.tx_queue_len, general.rx_queue_len), (1, 8));
}

#[test]
fn test_accept_all_filter() {
    let filter = TwaiFilterConfig::default();
    assert_eq!(filter.acceptance_code, 0);
    assert_eq!(filter.acceptance_mask, 0xFFFF_FFFF);
    assert!(filter.single_filter);
}
