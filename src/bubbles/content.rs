//! The hashtag strings bubbles are drawn from.

/// Default content pool. Order is stable; config files may replace it at startup.
pub const BUBBLE_TEXTS: [&str; 55] = [
    "#아무말대잔치",
    "#해외여행",
    "#맛집후기",
    "#함께해요",
    "#영화추천",
    "#심심해",
    "#바다여행",
    "#같이해요",
    "#책추천",
    "#나가서놀고싶다",
    "#우리들의공간",
    "#등산",
    "#음악추천",
    "#그냥말해봐",
    "#캠핑",
    "#질문있어요",
    "#게임추천",
    "#소소한일상",
    "#피크닉",
    "#대잔치",
    "#일상톡톡",
    "#드라마추천",
    "#정보공유",
    "#자전거",
    "#모르겠어",
    "#웹툰추천",
    "#같이이야기해요",
    "#여행후기",
    "#점심뭐먹지",
    "#만화추천",
    "#애니메이션",
    "#함께나눠요",
    "#오늘뭐하지",
    "#공연후기",
    "#전시회후기",
    "#카페추천",
    "#오늘도야근",
    "#디저트추천",
    "#옷브랜드추천",
    "#오운완",
    "#운동후기",
    "#요리후기",
    "#취미공유",
    "#다이어트",
    "#저메추",
    "#공유해요",
    "#소통해요",
    "#댓글달기",
    "#오늘의이야기",
    "#자유게시판",
    "#심심풀이",
    "#시간때우기",
    "#아무노래나일단틀어",
    "#아무말",
    "#대화해요",
];

/// The default pool as owned strings.
pub fn default_pool() -> Vec<String> {
    BUBBLE_TEXTS.iter().map(|text| text.to_string()).collect()
}
