#![no_main]

use libfuzzer_sys::fuzz_target;
use winmdscope::{
    metadata::{
        customattributes::{
            CustomAttributeDecoder, FieldCustomAttributeData, MethodCustomAttributeData,
            ParamCustomAttributeData, TypeCustomAttributeData,
        },
        view::MetadataView,
    },
    MetadataStore,
};

fuzz_target!(|data: &[u8]| {
    let _ = MetadataStore::from_mem(data.to_vec());

    let Ok(view) = MetadataView::parse(data) else {
        return;
    };
    let Ok(decoder) = CustomAttributeDecoder::new(&view) else {
        return;
    };

    let _ = decoder.decode_all::<TypeCustomAttributeData>();
    let _ = decoder.decode_all::<MethodCustomAttributeData>();
    let _ = decoder.decode_all::<FieldCustomAttributeData>();
    let _ = decoder.decode_all::<ParamCustomAttributeData>();
});
