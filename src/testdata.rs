const LC_SEGMENT_64_PAGEZERO_DATA: [u8; 72] = [
    0x19, 0x00, 0x00, 0x00, 0x48, 0x00, 0x00, 0x00, 0x5f, 0x5f, 0x50, 0x41, 0x47, 0x45, 0x5a, 0x45,
    0x52, 0x4f, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const LC_LOAD_DYLIB_DATA: [u8; 56] = [
    0x0c, 0x00, 0x00, 0x00, 0x38, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00,
    0x01, 0x0a, 0xca, 0x04, 0x00, 0x00, 0x01, 0x00, 0x2f, 0x75, 0x73, 0x72, 0x2f, 0x6c, 0x69, 0x62,
    0x2f, 0x6c, 0x69, 0x62, 0x53, 0x79, 0x73, 0x74, 0x65, 0x6d, 0x2e, 0x42, 0x2e, 0x64, 0x79, 0x6c,
    0x69, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const LC_MAIN_DATA: [u8; 24] = [
    0x28, 0x00, 0x00, 0x80, 0x18, 0x00, 0x00, 0x00, 0x00, 0x14, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const LC_CODE_SIGNATURE_DATA: [u8; 16] = [
    0x1d, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00,
];

const LC_UUID_DATA: [u8; 24] = [
    0x1b, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x92, 0xe3, 0xcf, 0x1f, 0x20, 0xda, 0x33, 0x73,
    0xa9, 0x8c, 0x85, 0x13, 0x66, 0xd3, 0x53, 0xbf,
];

const LC_RPATH_DATA: [u8; 32] = [
    0x1c, 0x00, 0x00, 0x80, 0x20, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x40, 0x6c, 0x6f, 0x61,
    0x64, 0x65, 0x72, 0x5f, 0x70, 0x61, 0x74, 0x68, 0x2f, 0x2e, 0x2e, 0x2f, 0x6c, 0x69, 0x62, 0x00,
];

const LC_LOAD_DYLINKER_DATA: [u8; 32] = [
    0x0e, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x2f, 0x75, 0x73, 0x72,
    0x2f, 0x6c, 0x69, 0x62, 0x2f, 0x64, 0x79, 0x6c, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
