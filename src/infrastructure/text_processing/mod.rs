mod model_reply;

pub use model_reply::{
    parse_bilingual_reply, strip_citation_markers, unwrap_code_fence, BilingualReply,
};
